// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use relit_core::Split;

/// Progress of one lighting variant inside a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariantState {
    #[default]
    Pending,
    RenderingTrain,
    RenderingTest,
    Complete,
    /// Found complete on disk before rendering started.
    Skipped,
}

impl VariantState {
    /// The rendering state for `split`.
    pub fn rendering(split: Split) -> Self {
        match split {
            Split::Train => VariantState::RenderingTrain,
            Split::Test => VariantState::RenderingTest,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, VariantState::Complete | VariantState::Skipped)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_advance_to(self, next: VariantState) -> bool {
        use VariantState::*;
        matches!(
            (self, next),
            (Pending, Skipped)
                | (Pending, RenderingTrain)
                | (Pending, RenderingTest)
                | (RenderingTrain, RenderingTest)
                | (RenderingTrain, Complete)
                | (RenderingTest, Complete)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        use VariantState::*;
        assert!(Pending.can_advance_to(Skipped));
        assert!(Pending.can_advance_to(VariantState::rendering(Split::Train)));
        assert!(RenderingTrain.can_advance_to(RenderingTest));
        assert!(RenderingTest.can_advance_to(Complete));
        assert!(!Skipped.can_advance_to(RenderingTrain));
        assert!(!Complete.can_advance_to(Pending));
        assert!(!RenderingTest.can_advance_to(RenderingTrain));
        assert!(Skipped.is_terminal() && Complete.is_terminal() && !RenderingTest.is_terminal());
    }
}
