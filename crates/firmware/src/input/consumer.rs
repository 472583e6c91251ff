//! Input event consumer task.
//!
//! Drains the edge queue, applies one [`Debouncer`] per event class and
//! forwards the surviving events as navigation [`Command`]s. The encoder
//! switch becomes [`Command::Primary`], the same command the play/pause
//! button produces.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use embassy_time::Instant;
use navigation::Command;
use platform::{EncoderEvent, InputDevice};

use super::config::InputConfig;
use super::debounce::Debouncer;

/// Debounce state for the encoder.
#[derive(Debug, Clone, Copy)]
pub struct InputConsumer {
    step: Debouncer,
    switch: Debouncer,
    reported_drops: u32,
}

impl InputConsumer {
    /// Consumer with the given debounce intervals.
    pub fn new(config: &InputConfig) -> Self {
        Self {
            step: Debouncer::new(config.step_debounce()),
            switch: Debouncer::new(config.switch_debounce()),
            reported_drops: 0,
        }
    }

    /// Classify one raw event received at `now`.
    ///
    /// `None` if the event falls inside its class's guard interval.
    pub fn accept(&mut self, event: EncoderEvent, now: Instant) -> Option<Command> {
        match event {
            EncoderEvent::Step(direction) => {
                self.step.accept(now).then_some(Command::Step(direction))
            }
            EncoderEvent::Switch => self.switch.accept(now).then_some(Command::Primary),
        }
    }

    /// Events dropped by the producer since the last call.
    fn new_drops(&mut self, total: u32) -> u32 {
        let fresh = total.wrapping_sub(self.reported_drops);
        self.reported_drops = total;
        fresh
    }

    /// Forward commands forever.
    pub async fn run<I, M, const N: usize>(
        &mut self,
        input: &mut I,
        commands: Sender<'_, M, Command, N>,
    ) -> !
    where
        I: InputDevice,
        M: RawMutex,
    {
        info!("input consumer started");
        loop {
            let event = input.wait_for_event().await;
            let fresh = self.new_drops(input.dropped_events());
            if fresh > 0 {
                warn!("input queue overflowed, {} events dropped", fresh);
            }
            match self.accept(event, Instant::now()) {
                Some(command) => {
                    trace!("input: {}", command.label());
                    commands.send(command).await;
                }
                None => trace!("input: bounce ignored"),
            }
        }
    }
}

impl Default for InputConsumer {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}
