//! Power control backends for bare-metal machines
//!
//! Traits for the four capabilities the power controller needs (wake, shutdown,
//! BMC power and reachability) plus default implementations:
//!
//! - [`UdpWakeSender`]: Wake-on-LAN magic packets over UDP broadcast
//! - [`SshShutdownExecutor`]: `sudo shutdown -h now` over SSH
//! - [`IpmitoolClient`]: chassis power through `ipmitool`
//! - [`PingProbe`]: ICMP echo with bounded retries
//!
//! # Example
//!
//! ```no_run
//! use power_client::{UdpWakeSender, WakeSender};
//!
//! # async fn example() -> Result<(), power_client::PowerError> {
//! let sender = UdpWakeSender::new(9, "255.255.255.255");
//! sender.wake("aa:bb:cc:dd:ee:ff", 9, None).await?;
//! # Ok(())
//! # }
//! ```

mod common;
pub mod error;
pub mod ipmi;
pub mod probe;
pub mod ssh;
pub mod wol;
#[path = "trait.rs"]
pub mod power_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use error::PowerError;
pub use ipmi::IpmitoolClient;
pub use power_trait::{BmcClient, ReachabilityProbe, ShutdownExecutor, WakeSender};
pub use probe::PingProbe;
pub use ssh::SshShutdownExecutor;
pub use wol::{DEFAULT_BROADCAST_ADDRESS, UdpWakeSender};
#[cfg(feature = "test-util")]
pub use mock::{BmcOperation, MockBmcClient, MockProbe, MockShutdownExecutor, MockWakeSender, WakeCall};
