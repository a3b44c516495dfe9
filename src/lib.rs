//! tour-planner core
//!
//! Greedy nearest-neighbor round-trip construction over a fixed city catalog:
//! continents are ordered first, then one city per continent is visited.

pub mod catalog;
pub mod haversine;
pub mod planner;
