//! Waiting-room and seat-hold entities.

pub mod lock;
pub mod token;

pub use lock::{LockStatus, SeatLock};
pub use token::{RoomTicket, WaitingRoomToken};
