pub mod output;
pub mod progress;
pub mod style;
pub mod table;

pub use output::{error, header, info, section, status, success, summary_row, timing, warn};
pub use progress::RecordSpinner;
pub use style::{is_quiet, palette, set_quiet, Marker, Palette, Tone};
pub use table::{stats_table, TableBuilder};
