//! Conditional-skip machine for If / ElseIf / Else / EndIf.

use crate::Command;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    branch_taken: bool,
    any_taken: bool,
}

/// Stack of open conditional blocks.
///
/// A command is suppressed while any open block is on an inactive branch.
/// The conditional commands themselves are never suppressed, so nesting stays
/// balanced inside skipped regions.
///
/// # Examples
///
/// ```
/// use hokusai_scenario::IfStack;
///
/// let mut stack = IfStack::new();
/// stack.push_if(false);
/// assert!(stack.is_suppressed());
/// stack.else_branch();
/// assert!(!stack.is_suppressed());
/// stack.end_if();
/// assert_eq!(stack.depth(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IfStack {
    frames: Vec<Frame>,
}

impl IfStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a block.
    pub fn push_if(&mut self, condition: bool) {
        self.frames.push(Frame {
            branch_taken: condition,
            any_taken: condition,
        });
    }

    /// Whether the innermost chain is still looking for a branch to take.
    ///
    /// `ElseIf` conditions need only be evaluated while this holds.
    pub fn awaits_branch(&self) -> bool {
        self.frames.last().is_some_and(|top| !top.any_taken)
    }

    /// Move to an `ElseIf` branch.
    pub fn else_if(&mut self, condition: bool) {
        let Some(top) = self.frames.last_mut() else {
            warn!("ElseIf without a matching If, ignored");
            return;
        };
        if top.any_taken {
            top.branch_taken = false;
        } else {
            top.branch_taken = condition;
            top.any_taken = condition;
        }
    }

    /// Move to the `Else` branch.
    pub fn else_branch(&mut self) {
        let Some(top) = self.frames.last_mut() else {
            warn!("Else without a matching If, ignored");
            return;
        };
        top.branch_taken = !top.any_taken;
        top.any_taken = true;
    }

    /// Close the innermost block.
    pub fn end_if(&mut self) {
        if self.frames.pop().is_none() {
            warn!("EndIf without a matching If, ignored");
        }
    }

    /// Whether any open block is on an inactive branch.
    pub fn is_suppressed(&self) -> bool {
        self.frames.iter().any(|frame| !frame.branch_taken)
    }

    /// Whether `command` must be skipped.
    pub fn should_skip(&self, command: &dyn Command) -> bool {
        !command.is_conditional_flow() && self.is_suppressed()
    }

    /// Number of open blocks.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Drop every open block.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
