use flexi_logger::{DeferredNow, style};
use log::Record;

/// `LEVEL message`, with the level coloured when stderr is a terminal.
pub fn cli_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    write!(w, "{:<5} {}", style(level).paint(level.to_string()), record.args())
}
