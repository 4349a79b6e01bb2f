//! List GitHub pull requests as fixed-width terminal lines and hand them to
//! fzf for interactive selection.
//!
//! The crate is split into a pure core and thin I/O shells around it:
//!
//! - [`display`] measures terminal cell widths and pads/truncates fields
//! - [`layout`] fits columns into the available terminal width
//! - [`render`] turns records and a column plan into styled lines
//! - [`model`] fetches pull requests via `gh` and synthesizes default-branch rows
//! - [`selector`] drives fzf and acts on the selection
//! - [`emoji`] substitutes `:code:` emoji short codes in titles
//! - [`spinner`] animates progress on stderr during the fetch
//!
//! `layout` and `display` perform no I/O; everything that talks to `gh`,
//! `git`, or the terminal lives in the other modules.

pub mod display;
pub mod emoji;
pub mod layout;
pub mod model;
pub mod render;
pub mod selector;
pub mod spinner;
