//! Quadrature rotary encoder with a wrapping position counter.
//!
//! Decoding uses a five-state machine for noise rejection: a step only
//! counts once both phases have walked the full Gray sequence in one
//! direction.  Each completed step moves the counter one notch, wrapping
//! at the bound range ends.

use embedded_hal::digital::InputPin;

use crate::traits::RotaryKnob;

#[derive(Clone, Copy, PartialEq)]
enum State {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

enum Step {
    Cw,
    Ccw,
}

pub struct RotaryEncoder<A, B, BTN> {
    clk: A,
    dt: B,
    button: BTN,
    state: State,
    last_clk: bool,
    last_dt: bool,
    min: u16,
    max: u16,
    value: u16,
}

impl<A, B, BTN> RotaryEncoder<A, B, BTN>
where
    A: InputPin,
    B: InputPin,
    BTN: InputPin,
{
    pub fn new(mut clk: A, mut dt: B, button: BTN) -> Self {
        let last_clk = clk.is_high().unwrap_or(true);
        let last_dt = dt.is_high().unwrap_or(true);
        Self {
            clk,
            dt,
            button,
            state: State::Idle,
            last_clk,
            last_dt,
            min: 0,
            max: 0,
            value: 0,
        }
    }

    /// Sample both phases once and run the decode state machine.
    fn sample(&mut self) -> Option<Step> {
        let clk = self.clk.is_high().unwrap_or(self.last_clk);
        let dt = self.dt.is_high().unwrap_or(self.last_dt);
        if clk == self.last_clk && dt == self.last_dt {
            return None;
        }
        let step = self.decode(clk, dt);
        self.last_clk = clk;
        self.last_dt = dt;
        step
    }

    /// CW: CLK leads DT. CCW: DT leads CLK. Bounce returns to Idle.
    fn decode(&mut self, clk: bool, dt: bool) -> Option<Step> {
        match self.state {
            State::Idle => {
                if !clk && dt {
                    self.state = State::CwStep1;
                } else if clk && !dt {
                    self.state = State::CcwStep1;
                }
                None
            }
            State::CwStep1 => {
                if !clk && !dt {
                    self.state = State::CwStep2;
                } else if clk && dt {
                    self.state = State::Idle;
                }
                None
            }
            State::CwStep2 => {
                if clk || dt {
                    self.state = State::Idle;
                    return Some(Step::Cw);
                }
                None
            }
            State::CcwStep1 => {
                if !clk && !dt {
                    self.state = State::CcwStep2;
                } else if clk && dt {
                    self.state = State::Idle;
                }
                None
            }
            State::CcwStep2 => {
                if clk || dt {
                    self.state = State::Idle;
                    return Some(Step::Ccw);
                }
                None
            }
        }
    }

    fn apply(&mut self, step: Step) {
        self.value = match step {
            Step::Cw => {
                if self.value >= self.max {
                    self.min
                } else {
                    self.value + 1
                }
            }
            Step::Ccw => {
                if self.value <= self.min {
                    self.max
                } else {
                    self.value - 1
                }
            }
        };
    }
}

impl<A, B, BTN> RotaryKnob for RotaryEncoder<A, B, BTN>
where
    A: InputPin,
    B: InputPin,
    BTN: InputPin,
{
    fn set_range(&mut self, min: u16, max: u16, initial: u16) {
        self.min = min;
        self.max = max;
        self.value = initial.clamp(min, max);
        self.state = State::Idle;
    }

    fn value(&mut self) -> u16 {
        // Drain a short burst of samples so a detent completed between
        // polls still lands as one step.
        for _ in 0..8 {
            if let Some(step) = self.sample() {
                self.apply(step);
            }
        }
        self.value
    }

    fn button_pressed(&mut self) -> bool {
        self.button.is_high().unwrap_or(false)
    }
}
