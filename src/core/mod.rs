//! # Core Application Logic
//!
//! This module contains r4r's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Gateway   │      │   Tests    │
//!     │  Adapter   │      │  (reqwest) │      │ (scripted  │
//!     │ (ratatui)  │      │            │      │  backend)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct — all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`session`]: Active project/phase/title
//! - [`transcript`]: Conversation pane view-model, typewriter and scroll model
//! - [`nav`]: Sidebar project tree
//! - [`header`]: Header label and save button
//! - [`notice`]: Toast notifications
//! - [`metrics`]: Reply metrics HUD
//! - [`phase`]: Phase ordering
//! - [`config`]: Settings resolution

pub mod action;
pub mod config;
pub mod header;
pub mod metrics;
pub mod nav;
pub mod notice;
pub mod phase;
pub mod session;
pub mod state;
pub mod transcript;
