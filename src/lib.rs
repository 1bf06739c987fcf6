//! Game-portal roster exporter: signs in to each listed account, pulls the
//! character roster and equipment, and renders one spreadsheet per account.

pub mod aggregate;
pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod merge;
pub mod runner;
pub mod session;
pub mod sheet;
