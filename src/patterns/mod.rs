//! Gang-of-Four design patterns, one file per pattern.

pub mod behavioral;
pub mod creational;
pub mod structural;
