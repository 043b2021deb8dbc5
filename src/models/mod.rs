pub mod answer;
pub mod appointment;
pub mod calendar;
pub mod enums;
pub mod medication;
pub mod question;
pub mod response;

pub use answer::*;
pub use appointment::*;
pub use calendar::*;
pub use enums::*;
pub use medication::*;
pub use question::*;
pub use response::*;
