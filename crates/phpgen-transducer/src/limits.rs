//! Limits for the recursive tree walk.

/// Maximum IR nesting depth.
///
/// Transduction recurses once per IR level; input nested deeper than this
/// fails with `TransduceError::NestingTooDeep` instead of overflowing the
/// stack. Real programs stay far below it: a chain like `a + b + c + ...`
/// nests one level per operand, so this admits expressions with a few
/// hundred operands.
pub const MAX_TRANSDUCE_DEPTH: usize = 500;

/// Free stack required before entering another IR level. Below this the walk
/// continues on a freshly allocated segment, so the depth limit holds on any
/// thread, whatever its stack size.
pub const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each extra stack segment.
pub const STACK_SEGMENT: usize = 2 * 1024 * 1024;
