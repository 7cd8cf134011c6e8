mod clock;
mod extract;
mod fix_state;
mod gps;
mod ingest;

pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use extract::extract;
pub use extract::normalize_longitude;
pub use extract::FixError;
pub use fix_state::FixHandle;
pub use fix_state::FixState;
pub use fix_state::FixStatus;
pub use fix_state::FixUpdate;
pub use fix_state::PollResponse;
pub use fix_state::Position;
pub use fix_state::TimeFix;
pub use gps::GPS;
pub use ingest::Event;
pub use ingest::Ingest;
pub use ingest::Termination;
