/// One axis of intent: -1, 0 or +1.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Motion {
    Negative,
    #[default]
    Idle,
    Positive,
}

impl Motion {
    pub fn sign(self) -> f32 {
        match self {
            Motion::Negative => -1.,
            Motion::Idle => 0.,
            Motion::Positive => 1.,
        }
    }
}

/// What the viewer wants to do this frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Intent {
    /// negative turns left (counter-clockwise on screen)
    pub turn: Motion,
    /// negative walks backwards
    pub walk: Motion,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    TurnLeft,
    TurnRight,
    WalkForward,
    WalkBackward,
}

/// Turns key start/stop events into an [`Intent`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Controls {
    intent: Intent,
}

impl Controls {
    pub fn press(&mut self, action: Action) {
        match action {
            Action::TurnLeft => self.intent.turn = Motion::Negative,
            Action::TurnRight => self.intent.turn = Motion::Positive,
            Action::WalkForward => self.intent.walk = Motion::Positive,
            Action::WalkBackward => self.intent.walk = Motion::Negative,
        }
    }

    pub fn release(&mut self, action: Action) {
        match action {
            Action::TurnLeft | Action::TurnRight => self.intent.turn = Motion::Idle,
            Action::WalkForward | Action::WalkBackward => self.intent.walk = Motion::Idle,
        }
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }
}
