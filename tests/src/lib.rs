//! End-to-end tests running the whole pipeline against mock devices.
//!
//! Every mock device listens on its own loopback address (`127.0.0.x`) but all
//! of them share one port, the way real devices share port 80 on a LAN. This
//! needs the whole `127.0.0.0/8` block routed to loopback, which Linux does.

#[cfg(all(test, target_os = "linux"))]
mod pipeline;
#[cfg(all(test, target_os = "linux"))]
mod utils;
