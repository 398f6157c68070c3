//! Electric powertrain models.
//!
//! A [`Powertrain`] couples an electronic speed controller ([`Esc`]) to a
//! brushless DC motor ([`DcMotor`]) loaded by a propeller. Simulating the full
//! PWM signal needs a small step size, around `1e-5` s.

mod commutation;
mod dc_motor;
mod drive;
mod esc;

pub use dc_motor::{DcMotor, DcMotorParams};
pub use drive::{Powertrain, PowertrainParams};
pub use esc::{Esc, EscParams};
