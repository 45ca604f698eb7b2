/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 3/9/24
******************************************************************************/

pub mod config;

pub mod constants;

pub mod error;

pub mod application;

pub mod runner;

pub mod session;

pub mod transport;

pub mod utils;
