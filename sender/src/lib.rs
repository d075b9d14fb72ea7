pub mod client;
pub mod options;
pub mod run;
