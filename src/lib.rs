// Copyright 2023 Remi Bernotavicius

pub mod database;
pub mod error;
pub mod presentation;
pub mod repository;
pub mod seed;

pub use error::{Result, StoreError};
