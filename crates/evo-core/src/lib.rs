// ABOUTME: Core types and constants for the EVO plan generation engine
// ABOUTME: Foundation crate with error handling, the plan data model, and domain constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # EVO Core
//!
//! Foundation crate providing shared types for the EVO plan generation engine.
//! Nothing here performs I/O; the engine crate wires these types to catalogs,
//! stores and profile providers.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ErrorResponse`
//! - **models**: Algorithm configuration, catalog candidates, workout and diet plans
//! - **constants**: Muscle groups, equipment names, and meal clock times

/// Unified error handling system with standard error codes and HTTP projections
pub mod errors;

/// Domain constants shared by the catalog, the candidate pool and the generators
pub mod constants;

/// Plan data model (configuration, candidates, workout and diet plans)
pub mod models;
