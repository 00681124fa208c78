/*!
 * Data Structures
 *
 * Small building blocks shared across the crate:
 * - Inline strings for type names, field paths and error messages
 */

mod inline_string;

pub use inline_string::InlineString;
