use flexi_logger::{DeferredNow, style};
use log::Record;

/// `LEVEL message`, coloured by level.
pub fn cli_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    write!(w, "{} {}", style(level).paint(level.as_str()), record.args())
}
