//! Terminal rendering for the 21 Run table.
//!
//! The table is laid out as text: a [`TableView`] turns engine state into a
//! [`Frame`] of styled lines (pure, unit-testable), and the
//! [`TerminalRenderer`] flushes frames to the terminal, rewriting only the
//! lines that changed since the previous frame.

pub mod frame;
pub mod renderer;
pub mod table_view;

pub use run21_core as core;
pub use run21_engine as engine;
pub use run21_types as types;

pub use frame::{Frame, Line, Span, Tone};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use table_view::{card_label, TableView};
