//! Application wiring.
//!
//! [`run`] drives the three long-lived tasks on one executor: the
//! [`AudioEngine`], the [`InputConsumer`] and the [`ControlLoop`]. The
//! encoder interrupts feed [`INPUT_EVENTS`](crate::input::INPUT_EVENTS)
//! from outside.

use embassy_futures::select::{select3, Either3};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal::digital::InputPin;
use navigation::Command;
use platform::config::{APP_NAME, APP_VERSION};
use platform::{AudioOutput, CatalogProvider, InputDevice, Storage};
use playback::{AudioEngine, PlayerContext};

use crate::control::ControlLoop;
use crate::input::{ButtonPoller, InputConfig, InputConsumer};

/// Commands buffered between the input consumer and the control loop.
pub const COMMAND_QUEUE_DEPTH: usize = 8;

/// Consumer-to-control-loop command queue.
pub type CommandChannel = Channel<CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH>;

/// The device's player context.
pub static PLAYER: PlayerContext = PlayerContext::new();

/// The device's command queue.
pub static COMMANDS: CommandChannel = Channel::new();

/// Everything the controller needs from the board.
pub struct Board<S, O, C, I, P, const B: usize> {
    /// Audio resource reader.
    pub storage: S,
    /// The single PCM output.
    pub output: O,
    /// Directory listing of the card.
    pub catalog: C,
    /// Encoder event source.
    pub input: I,
    /// Level-polled buttons.
    pub buttons: ButtonPoller<P, B>,
}

/// Run the controller forever.
pub async fn run<S, O, C, I, P, const B: usize>(
    player: &PlayerContext,
    commands: &CommandChannel,
    board: Board<S, O, C, I, P, B>,
    config: &InputConfig,
) -> !
where
    S: Storage,
    O: AudioOutput,
    C: CatalogProvider,
    I: InputDevice,
    P: InputPin,
{
    let Board {
        storage,
        output,
        catalog,
        mut input,
        buttons,
    } = board;
    info!("{} {} starting", APP_NAME, APP_VERSION);

    let mut engine = AudioEngine::new(player, storage, output);
    let mut consumer = InputConsumer::new(config);
    let mut control = ControlLoop::new(player, catalog, buttons);

    match select3(
        engine.run(),
        consumer.run(&mut input, commands.sender()),
        control.run(commands.receiver()),
    )
    .await
    {
        Either3::First(never) | Either3::Second(never) | Either3::Third(never) => never,
    }
}
