use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which leg of a verification run a timer belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    Scan,
    ResultDisplay,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TimerOperation {
    NotifyAfter { millis: u64, phase: TimerPhase },
}

impl TimerOperation {
    #[must_use]
    pub const fn duration(&self) -> Duration {
        match self {
            Self::NotifyAfter { millis, .. } => Duration::from_millis(*millis),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> TimerPhase {
        match self {
            Self::NotifyAfter { phase, .. } => *phase,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerOutput {
    Elapsed,
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

/// One-shot timers resolved by the shell.
///
/// There is no cancel operation: the core tags every timer with the run that
/// armed it and ignores the ones that outlive their run.
pub struct Timer<E> {
    context: CapabilityContext<TimerOperation, E>,
}

impl<E> Clone for Timer<E> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Timer<Ev> {
    type Operation = TimerOperation;
    type MappedSelf<MappedEv> = Timer<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: Send + 'static,
    {
        Timer::new(self.context.map_event(f))
    }
}

impl<E> Timer<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<TimerOperation, E>) -> Self {
        Self { context }
    }

    pub fn notify_after<F>(&self, after: Duration, phase: TimerPhase, callback: F)
    where
        F: FnOnce(TimerOutput) -> E + Send + 'static,
    {
        let millis = u64::try_from(after.as_millis()).unwrap_or(u64::MAX);
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(TimerOperation::NotifyAfter { millis, phase })
                .await;
            ctx.update_app(callback(output));
        });
    }
}
