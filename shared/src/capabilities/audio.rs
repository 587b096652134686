use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Audio cues the shell plays after a scan resolves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AudioOperation {
    SuccessCue,
    ErrorCue,
}

impl Operation for AudioOperation {
    type Output = ();
}

/// Fire-and-forget: nothing the shell does with a cue flows back into the core.
pub struct Audio<E> {
    context: CapabilityContext<AudioOperation, E>,
}

impl<E> Clone for Audio<E> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Audio<Ev> {
    type Operation = AudioOperation;
    type MappedSelf<MappedEv> = Audio<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: Send + 'static,
    {
        Audio::new(self.context.map_event(f))
    }
}

impl<E> Audio<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<AudioOperation, E>) -> Self {
        Self { context }
    }

    pub fn play_success_cue(&self) {
        self.notify(AudioOperation::SuccessCue);
    }

    pub fn play_error_cue(&self) {
        self.notify(AudioOperation::ErrorCue);
    }

    fn notify(&self, operation: AudioOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
