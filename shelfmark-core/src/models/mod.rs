mod book;
mod fine;
mod isbn;
mod loan;

pub use book::*;
pub use fine::*;
pub use isbn::*;
pub use loan::*;
