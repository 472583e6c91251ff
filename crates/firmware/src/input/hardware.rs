//! STM32 GPIO adapters for the encoder and the polled buttons.
//!
//! # Pin assignments
//!
//! | Signal          | Notes                                   |
//! |-----------------|-----------------------------------------|
//! | Encoder A       | EXTI rising edge, primary phase line    |
//! | Encoder B       | plain input, sampled on A's edge        |
//! | Encoder switch  | EXTI rising edge                        |
//! | Play/Pause      | plain input, active high, polled        |
//! | Home            | plain input, active high, polled        |
//! | Volume up/down  | plain input, active high, polled        |
//!
//! The EXTI waits run in one executor task that does nothing but classify
//! edges into [`INPUT_EVENTS`]; it never awaits the queue, so a stalled
//! consumer only costs dropped events.

use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{AnyPin, Input};
use platform::Button;

use super::buttons::ButtonPoller;
use super::config::InputConfig;
use super::edge::INPUT_EVENTS;

/// Polled lines on the device.
pub const BUTTON_COUNT: usize = 4;

/// Button poller over the board's plain GPIO inputs.
pub type BoardButtons = ButtonPoller<Input<'static, AnyPin>, BUTTON_COUNT>;

/// Build the poller for the four level-polled buttons.
pub fn board_buttons(
    config: &InputConfig,
    play_pause: Input<'static, AnyPin>,
    home: Input<'static, AnyPin>,
    volume_up: Input<'static, AnyPin>,
    volume_down: Input<'static, AnyPin>,
) -> BoardButtons {
    let mut poller = ButtonPoller::new(config);
    for (button, pin) in [
        (Button::PlayPause, play_pause),
        (Button::Home, home),
        (Button::VolumeUp, volume_up),
        (Button::VolumeDown, volume_down),
    ] {
        if poller.add(button, pin).is_err() {
            error!("no slot for {}", button.label());
        }
    }
    poller
}

/// Spawn the encoder edge task. Call once at start-up.
pub fn spawn_encoder_task(
    spawner: &Spawner,
    phase_a: ExtiInput<'static, AnyPin>,
    phase_b: Input<'static, AnyPin>,
    switch: ExtiInput<'static, AnyPin>,
) {
    if spawner.spawn(encoder_task(phase_a, phase_b, switch)).is_err() {
        error!("encoder task already running");
    }
}

#[embassy_executor::task]
async fn encoder_task(
    mut phase_a: ExtiInput<'static, AnyPin>,
    phase_b: Input<'static, AnyPin>,
    mut switch: ExtiInput<'static, AnyPin>,
) {
    join(
        phase_loop(&mut phase_a, &phase_b),
        switch_loop(&mut switch),
    )
    .await;
}

async fn phase_loop(a: &mut ExtiInput<'static, AnyPin>, b: &Input<'static, AnyPin>) {
    loop {
        a.wait_for_rising_edge().await;
        INPUT_EVENTS.on_primary_edge(b.is_high());
    }
}

async fn switch_loop(switch: &mut ExtiInput<'static, AnyPin>) {
    loop {
        switch.wait_for_rising_edge().await;
        INPUT_EVENTS.on_switch_edge();
    }
}
