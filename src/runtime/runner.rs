use crate::action::cover::{Cover, compose};
use crate::action::leaf::Effect;
use crate::action::model::{Action, ActionKind, EndHook, GroupMode, Special, Timing};
use crate::foundation::core::Total;
use crate::foundation::error::KinemaResult;
use crate::runtime::actor::Actor;
use crate::visual::surface::Visual;

/// Why playback stopped before the root finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Halt {
    Killed,
    Ended,
}

/// Position in the cover list; `epoch` changes whenever the list is cleared.
#[derive(Clone, Copy, Debug)]
struct Mark {
    epoch: u64,
    len: usize,
}

/// Everything a runner may touch during one tick.
pub(crate) struct StepCtx<'a> {
    pub(crate) now: u64,
    pub(crate) actor: &'a mut dyn Actor,
    pub(crate) covers: &'a mut Vec<Cover>,
    pub(crate) root: &'a Action,
    pub(crate) on_end: Option<&'a EndHook>,
    pub(crate) halt: Option<Halt>,
    epoch: u64,
}

impl<'a> StepCtx<'a> {
    pub(crate) fn new(
        now: u64,
        actor: &'a mut dyn Actor,
        covers: &'a mut Vec<Cover>,
        root: &'a Action,
        on_end: Option<&'a EndHook>,
    ) -> Self {
        Self {
            now,
            actor,
            covers,
            root,
            on_end,
            halt: None,
            epoch: 0,
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            epoch: self.epoch,
            len: self.covers.len(),
        }
    }

    /// Bring `input` up to date with the covers registered since `mark`. After a clear the
    /// state is rebuilt from the actor's base instead.
    fn refresh(&self, input: Visual, mark: Mark) -> KinemaResult<Visual> {
        if mark.epoch != self.epoch {
            return compose(self.actor.base(), &self.covers[..]);
        }
        compose(input, self.covers.get(mark.len..).unwrap_or(&[]))
    }
}

/// Outcome of stepping a runner once.
#[derive(Debug)]
pub(crate) enum Step {
    Running(Option<Visual>),
    /// Finished at the nominal time `at`, which may lie before the current tick.
    Done { at: u64, delta: Option<Visual> },
}

/// Playback state of one action node: the repetition count plus the live pass.
///
/// Each pass starts exactly where the previous one ended, and a finished pass hands over to its
/// successor within the same tick, so chained actions accumulate no drift.
#[derive(Debug)]
pub(crate) struct Runner {
    action: Action,
    passes: u64,
    cursor: u64,
    pass: Option<Pass>,
}

#[derive(Debug)]
enum Pass {
    Leaf(LeafPass),
    Instant(Special),
    Remain,
    Sequential(SeqPass),
    Parallel(ParPass),
}

#[derive(Debug)]
struct LeafPass {
    effect: Effect,
    start: u64,
    last_sample: Option<u64>,
    /// Progress at the last sample; throttled steps reuse it on their fresh input.
    progress: f64,
}

#[derive(Debug)]
struct SeqPass {
    index: usize,
    at: u64,
    child: Option<Box<Runner>>,
}

#[derive(Debug)]
struct ParPass {
    active: Vec<Runner>,
    latest_end: u64,
}

impl Runner {
    pub(crate) fn new(action: Action, at: u64) -> Self {
        Self {
            action,
            passes: 0,
            cursor: at,
            pass: None,
        }
    }

    pub(crate) fn step(&mut self, ctx: &mut StepCtx<'_>, input: &Visual) -> KinemaResult<Step> {
        let mut input = input.clone();
        let mut mark = ctx.mark();
        let mut delta = None;
        loop {
            if !self.action.timing.total.allows(self.passes) {
                return Ok(Step::Done {
                    at: self.cursor,
                    delta,
                });
            }
            let pass_start = self.cursor;
            let (at, out) = match self.step_pass(ctx, &input)? {
                Step::Running(out) => return Ok(Step::Running(out.or(delta))),
                Step::Done { at, delta } => (at, delta),
            };
            self.passes += 1;
            self.cursor = at;
            self.pass = None;
            if out.is_some() {
                delta = out;
            }
            if ctx.halt.is_some() {
                return Ok(Step::Running(delta));
            }
            // An endless run of zero-length passes resumes next tick.
            if at == pass_start && self.action.timing.total == Total::Infinite {
                return Ok(Step::Running(delta));
            }
            input = ctx.refresh(input, mark)?;
            mark = ctx.mark();
        }
    }

    fn step_pass(&mut self, ctx: &mut StepCtx<'_>, input: &Visual) -> KinemaResult<Step> {
        let start = self.cursor;
        if self.pass.is_none() {
            let base = ctx.actor.base();
            self.pass = Some(begin(&self.action, start, input, &base)?);
        }
        let Some(pass) = self.pass.as_mut() else {
            return Ok(Step::Done {
                at: start,
                delta: None,
            });
        };
        match pass {
            Pass::Leaf(lp) => step_leaf(&self.action.timing, lp, ctx, input),
            Pass::Instant(special) => {
                run_special(special, ctx)?;
                Ok(Step::Done {
                    at: start,
                    delta: None,
                })
            }
            Pass::Remain => Ok(Step::Running(None)),
            Pass::Sequential(sp) => step_sequential(self.action.children(), sp, ctx, input),
            Pass::Parallel(pp) => step_parallel(pp, ctx, input),
        }
    }
}

fn begin(action: &Action, start: u64, input: &Visual, base: &Visual) -> KinemaResult<Pass> {
    Ok(match &action.kind {
        ActionKind::Leaf(leaf) => Pass::Leaf(LeafPass {
            effect: leaf.resolve(input, base)?,
            start,
            last_sample: None,
            progress: 0.0,
        }),
        ActionKind::Special(Special::Remain) => Pass::Remain,
        ActionKind::Special(special) => Pass::Instant(special.clone()),
        ActionKind::Group {
            mode: GroupMode::Sequential,
            ..
        } => Pass::Sequential(SeqPass {
            index: 0,
            at: start,
            child: None,
        }),
        ActionKind::Group {
            mode: GroupMode::Parallel,
            children,
        } => Pass::Parallel(ParPass {
            active: children
                .iter()
                .map(|child| Runner::new(child.clone(), start))
                .collect(),
            latest_end: start,
        }),
    })
}

fn step_leaf(
    timing: &Timing,
    lp: &mut LeafPass,
    ctx: &mut StepCtx<'_>,
    input: &Visual,
) -> KinemaResult<Step> {
    let progress = if timing.duration_ms == 0 {
        1.0
    } else {
        match lp.last_sample {
            Some(last) if ctx.now.saturating_sub(last) <= timing.interval_ms => lp.progress,
            _ => {
                lp.last_sample = Some(ctx.now);
                lp.progress =
                    (ctx.now.saturating_sub(lp.start) as f64 / timing.duration_ms as f64).min(1.0);
                lp.progress
            }
        }
    };

    let out = lp.effect.sample(progress, timing.interp, input)?;
    if progress >= 1.0 {
        if timing.cover {
            ctx.covers.push(Cover::new(lp.effect.clone(), timing.interp));
            tracing::trace!(kind = lp.effect.kind(), "cover registered");
        }
        return Ok(Step::Done {
            at: lp.start + timing.duration_ms,
            delta: out,
        });
    }
    Ok(Step::Running(out))
}

fn run_special(special: &Special, ctx: &mut StepCtx<'_>) -> KinemaResult<()> {
    match special {
        Special::Call(hook) => hook.invoke(&mut *ctx.actor)?,
        Special::Clear => {
            ctx.covers.clear();
            ctx.epoch += 1;
            tracing::trace!("covers cleared");
        }
        Special::Kill { call_end } => {
            if *call_end {
                if let Some(on_end) = ctx.on_end {
                    on_end.invoke(&mut *ctx.actor, ctx.root)?;
                }
            }
            ctx.actor.kill();
            ctx.halt = Some(Halt::Killed);
        }
        Special::End => {
            ctx.actor.end();
            ctx.halt = Some(Halt::Ended);
        }
        Special::Remain => {}
    }
    Ok(())
}

fn step_sequential(
    children: &[Action],
    sp: &mut SeqPass,
    ctx: &mut StepCtx<'_>,
    input: &Visual,
) -> KinemaResult<Step> {
    let mut input = input.clone();
    let mut mark = ctx.mark();
    let mut delta = None;
    loop {
        if sp.child.is_none() {
            let Some(next) = children.get(sp.index) else {
                return Ok(Step::Done { at: sp.at, delta });
            };
            sp.child = Some(Box::new(Runner::new(next.clone(), sp.at)));
        }
        let Some(child) = sp.child.as_mut() else {
            return Ok(Step::Done { at: sp.at, delta });
        };
        match child.step(ctx, &input)? {
            Step::Running(out) => return Ok(Step::Running(out.or(delta))),
            Step::Done { at, delta: out } => {
                if out.is_some() {
                    delta = out;
                }
                sp.at = at;
                sp.index += 1;
                sp.child = None;
                if ctx.halt.is_some() {
                    return Ok(Step::Running(delta));
                }
                input = ctx.refresh(input, mark)?;
                mark = ctx.mark();
            }
        }
    }
}

/// Children run as a pipeline: each one's output is the next one's input for this tick.
fn step_parallel(
    pp: &mut ParPass,
    ctx: &mut StepCtx<'_>,
    input: &Visual,
) -> KinemaResult<Step> {
    let mut current = input.clone();
    let mut produced = false;
    let mut i = 0;
    while i < pp.active.len() {
        let (out, finished) = match pp.active[i].step(ctx, &current)? {
            Step::Running(out) => (out, None),
            Step::Done { at, delta } => (delta, Some(at)),
        };
        if let Some(out) = out {
            current = out;
            produced = true;
        }
        match finished {
            Some(at) => {
                pp.latest_end = pp.latest_end.max(at);
                pp.active.remove(i);
            }
            None => i += 1,
        }
        if ctx.halt.is_some() {
            return Ok(Step::Running(produced.then_some(current)));
        }
    }
    let delta = produced.then_some(current);
    if pp.active.is_empty() {
        Ok(Step::Done {
            at: pp.latest_end,
            delta,
        })
    } else {
        Ok(Step::Running(delta))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/runner.rs"]
mod tests;
