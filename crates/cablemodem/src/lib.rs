//! Channel and status metrics scraped from cable modem diagnostic pages.
//!
//! A poll cycle is a single unauthenticated GET of the modem's root page
//! ([`fetcher`]) followed by layout-tolerant parsing of the returned markup
//! ([`parser`]) into a [`Snapshot`]. Only a failed fetch aborts a cycle;
//! anything unexpected in the markup degrades to partial or empty results.
//!
//! ```rust,no_run
//! # async fn doc_test() -> Result<(), cablemodem_parser::TransportError> {
//! let snapshot = cablemodem_parser::get_status("192.168.100.1").await?;
//! for channel in &snapshot.downstream {
//!     println!("{}: {} dBmV", channel.channel, channel.power_dbmv);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fetcher;
pub mod modem;
pub mod parser;
pub mod poller;
pub mod status;

pub use error::{RowError, TransportError};
pub use fetcher::{DEFAULT_TIMEOUT, Fetcher};
pub use modem::{ArrisModem, StatusSource, get_status, parse_status};
pub use poller::{DEFAULT_POLL_INTERVAL, PollState, StatusPoller};
pub use status::{DownstreamChannel, Snapshot, StartupStatus, UpstreamChannel};
