//! The budget controller: tracks cycles spent against an optional turn budget and decides when
//! to warn, prompt the operator for an extension, or fail the active node outright.
//!
//! Grounded on `original_source/.../engine/engine.py`'s budget fields and
//! `increment_message_cycles` / `is_budget_exhausted` / `is_approaching_budget_limit` (§4.5).

const WARNING_LOOKAHEAD: u32 = 10;
const EXTENSION_CYCLES: u32 = 20;
const BUFFER_CYCLES: u32 = 10;

/// What the engine loop should do after a turn's budget check.
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetOutcome {
    /// Nothing to report; keep going.
    Continue,
    /// Softer heads-up: within `WARNING_LOOKAHEAD` cycles of the budget, not yet warned.
    ApproachingLimit { cycles_used: u32, budget: u32 },
    /// The budget has been reached for the first time: a SYSTEM message plus a ten-cycle grace
    /// buffer is owed to the active node.
    Reached { cycles_used: u32, budget: u32 },
    /// The budget was reached a second time after the grace buffer; the operator must approve
    /// an extension or the active node fails.
    NeedsExtensionDecision { cycles_used: u32, budget: u32 },
}

#[derive(Debug)]
pub struct BudgetController {
    total_budget: Option<u32>,
    cycles_used: u32,
    warning_shown: bool,
}

impl BudgetController {
    pub fn new(total_budget: Option<u32>) -> Self {
        Self { total_budget, cycles_used: 0, warning_shown: false }
    }

    pub fn cycles_used(&self) -> u32 {
        self.cycles_used
    }

    pub fn total_budget(&self) -> Option<u32> {
        self.total_budget
    }

    pub fn remaining(&self) -> Option<u32> {
        self.total_budget.map(|b| b.saturating_sub(self.cycles_used))
    }

    /// Extends the budget by `EXTENSION_CYCLES` and clears the warning flag so the next
    /// approach gets re-warned. Called when the operator approves a `NeedsExtensionDecision`.
    pub fn extend(&mut self) {
        if let Some(budget) = self.total_budget.as_mut() {
            *budget += EXTENSION_CYCLES;
        }
        self.warning_shown = false;
    }

    /// Grows the budget by `BUFFER_CYCLES` without touching `warning_shown`, so the node gets a
    /// ten-cycle grace window before `NeedsExtensionDecision` can fire. Called once per node when
    /// its budget is first `Reached`.
    pub fn add_buffer(&mut self) {
        if let Some(budget) = self.total_budget.as_mut() {
            *budget += BUFFER_CYCLES;
        }
    }

    /// Advances the cycle counter by one turn and reports what the engine should do about it.
    /// Must be called exactly once per completed turn (§4.5, §8 "cycles_used non-decreasing").
    pub fn increment_and_check(&mut self) -> BudgetOutcome {
        self.cycles_used += 1;
        let Some(budget) = self.total_budget else {
            return BudgetOutcome::Continue;
        };

        if self.cycles_used >= budget {
            if self.warning_shown {
                return BudgetOutcome::NeedsExtensionDecision { cycles_used: self.cycles_used, budget };
            }
            self.warning_shown = true;
            return BudgetOutcome::Reached { cycles_used: self.cycles_used, budget };
        }

        if !self.warning_shown && budget.saturating_sub(self.cycles_used) <= WARNING_LOOKAHEAD {
            self.warning_shown = true;
            return BudgetOutcome::ApproachingLimit { cycles_used: self.cycles_used, budget };
        }

        BudgetOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_budget_always_continues() {
        let mut controller = BudgetController::new(None);
        for _ in 0..100 {
            assert_eq!(controller.increment_and_check(), BudgetOutcome::Continue);
        }
    }

    #[test]
    fn budget_of_zero_warns_on_first_turn() {
        let mut controller = BudgetController::new(Some(0));
        let outcome = controller.increment_and_check();
        assert_eq!(outcome, BudgetOutcome::Reached { cycles_used: 1, budget: 0 });
    }

    #[test]
    fn approaching_limit_warns_within_ten_cycles() {
        let mut controller = BudgetController::new(Some(15));
        for _ in 0..4 {
            assert_eq!(controller.increment_and_check(), BudgetOutcome::Continue);
        }
        let outcome = controller.increment_and_check();
        assert_eq!(outcome, BudgetOutcome::ApproachingLimit { cycles_used: 5, budget: 15 });
    }

    #[test]
    fn reaching_budget_after_warning_requires_extension_decision() {
        let mut controller = BudgetController::new(Some(2));
        assert_eq!(controller.increment_and_check(), BudgetOutcome::ApproachingLimit { cycles_used: 1, budget: 2 });
        assert_eq!(controller.increment_and_check(), BudgetOutcome::NeedsExtensionDecision { cycles_used: 2, budget: 2 });
    }

    #[test]
    fn extend_pushes_budget_and_resets_warning() {
        let mut controller = BudgetController::new(Some(1));
        assert_eq!(controller.increment_and_check(), BudgetOutcome::Reached { cycles_used: 1, budget: 1 });
        controller.extend();
        assert_eq!(controller.total_budget(), Some(21));
        assert_eq!(controller.increment_and_check(), BudgetOutcome::Continue);
    }

    #[test]
    fn add_buffer_grows_budget_by_ten_and_keeps_warning_shown() {
        let mut controller = BudgetController::new(Some(1));
        assert_eq!(controller.increment_and_check(), BudgetOutcome::Reached { cycles_used: 1, budget: 1 });
        controller.add_buffer();
        assert_eq!(controller.total_budget(), Some(11));
        // The buffer doesn't re-open the approaching-limit warning; the node proceeds under
        // grace until the buffered budget itself is reached.
        for _ in 0..9 {
            assert_eq!(controller.increment_and_check(), BudgetOutcome::Continue);
        }
        assert_eq!(
            controller.increment_and_check(),
            BudgetOutcome::NeedsExtensionDecision { cycles_used: 11, budget: 11 }
        );
    }

    #[test]
    fn cycles_used_never_decreases() {
        let mut controller = BudgetController::new(Some(5));
        let mut last = 0;
        for _ in 0..10 {
            controller.increment_and_check();
            assert!(controller.cycles_used() >= last);
            last = controller.cycles_used();
        }
    }
}
