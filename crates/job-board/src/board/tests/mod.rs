mod common;

mod accounts;
mod catalogue;
mod positions;
