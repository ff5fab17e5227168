//! The scenario session state machine.
//!
//! One session drives one trainee through the tool-selection task:
//! detect the reference object, evaluate a tool choice, branch into
//! success or retry paths. The session owns the only persistent mutable
//! state in the engine and is the single consumer of marker events;
//! `process` runs to completion per event, in frame order, with no
//! internal suspension. Delayed effects (retry re-enable, splash, the
//! completion narration) go through the cancel-safe scheduler and are
//! drained by `tick`.

use std::collections::HashSet;

use arcoach_core::geometry::{DEFAULT_OUTLINE_MARGIN, Outline, Pose};
use arcoach_core::scheduler::{MonotonicScheduler, ScheduleHandle};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::command::{Command, OverlayId, PropId, instructions};
use super::marker::{LabelVocabulary, MarkerEvent, MarkerLabel};
use super::narration::{AudioCue, NarrationPolicy};

/// Texts shown on the floating detection label.
pub mod display {
    /// Label after the first reference detection.
    pub const OBJECT_DETECTED: &str = "Object detected";
    /// Label after the post-solve reference detection.
    pub const SECOND_REFERENCE: &str = "Second reference detected";
    /// Label after the correct tool is scanned.
    pub const CORRECT_ANSWER: &str = "Correct answer";
    /// Label after a wrong tool is scanned.
    pub const WRONG_ANSWER: &str = "Wrong answer";
}

/// Coarse scenario progress.
///
/// Replaces a pair of implicit booleans; the fourth combination (tool
/// evaluated without a reference scan) collapses into `ToolEvaluated`,
/// which tolerates a missing anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing scanned yet.
    AwaitingReference,
    /// Reference scanned, waiting on a tool choice.
    ReferenceShown,
    /// A correct tool answer has been scanned.
    ToolEvaluated,
}

/// Effects that fire after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEffect {
    /// Re-enable detection after the wrong-answer retry pause.
    ReEnableDetection,
    /// End the logo splash and show the welcome prompt.
    HideSplash,
    /// Play the closing narration.
    PlayCompletion,
}

/// Tunable scenario parameters.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Recognizer-string to label mapping.
    pub vocabulary: LabelVocabulary,
    /// Designer-placed pose for the reassembly prop. The anchor is
    /// captured from here at the first reference detection, never from
    /// the live (jittering) marker corners.
    pub reassembly_anchor: Pose,
    /// Outward margin for the detection outline.
    pub outline_margin: f32,
    /// Pause before detection re-enables after a wrong answer.
    pub re_enable_delay: Duration,
    /// Duration of the logo splash on session (re)start.
    pub splash_delay: Duration,
    /// Pause before the closing narration plays.
    pub completion_delay: Duration,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            vocabulary: LabelVocabulary::default(),
            reassembly_anchor: Pose::identity(),
            outline_margin: DEFAULT_OUTLINE_MARGIN,
            re_enable_delay: Duration::seconds(10),
            splash_delay: Duration::seconds(5),
            completion_delay: Duration::seconds(10),
        }
    }
}

/// The scenario state machine. See the module docs for the model.
#[derive(Debug)]
pub struct ScenarioSession {
    id: Uuid,
    config: ScenarioConfig,
    stage: Stage,
    fired_once: HashSet<MarkerLabel>,
    anchor: Option<Pose>,
    display_text: String,
    outline: Outline,
    narration: NarrationPolicy,
    scheduler: MonotonicScheduler<ScheduledEffect>,
    pending_re_enable: Option<ScheduleHandle>,
    detection_enabled: bool,
}

impl ScenarioSession {
    /// Creates a fresh session. Call [`Self::reset`] before feeding
    /// events to run the start sequence.
    #[must_use]
    pub fn new(config: ScenarioConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            stage: Stage::AwaitingReference,
            fired_once: HashSet::new(),
            anchor: None,
            display_text: String::new(),
            outline: Outline::degenerate(),
            narration: NarrationPolicy::new(),
            scheduler: MonotonicScheduler::new(),
            pending_re_enable: None,
            detection_enabled: true,
        }
    }

    /// Session identifier (carried in tracing spans).
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The label vocabulary this session resolves detections with.
    #[must_use]
    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.config.vocabulary
    }

    /// Current scenario stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Current floating-label text.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Outline of the most recent detection.
    #[must_use]
    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Whether a single-shot label has fired this session.
    #[must_use]
    pub fn has_fired(&self, label: MarkerLabel) -> bool {
        self.fired_once.contains(&label)
    }

    /// Last commanded/acknowledged detection state.
    #[must_use]
    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled
    }

    /// Number of delayed effects still pending.
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.scheduler.pending()
    }

    /// Acknowledgment from the surface that detection was toggled out of
    /// band (e.g. by a hardware switch). Updates the mirror only.
    pub fn acknowledge_detection(&mut self, enabled: bool) {
        self.detection_enabled = enabled;
    }

    /// Processes one marker event and returns the commands it produced.
    ///
    /// The outline always tracks the latest detection, even when the
    /// label's effect is suppressed by the single-shot policy.
    #[tracing::instrument(skip_all, fields(session = %self.id, marker = %event.text))]
    pub fn process(&mut self, now: DateTime<Utc>, event: &MarkerEvent) -> Vec<Command> {
        self.outline = event.corners.outline(self.config.outline_margin);

        let Some(label) = event.label else {
            tracing::debug!("unrecognized marker, outline only");
            return Vec::new();
        };

        let mut rearmed = false;
        if label.is_single_shot() && self.fired_once.contains(&label) {
            let rearm = label == MarkerLabel::Reference
                && self.fired_once.contains(&MarkerLabel::CorrectTool);
            if !rearm {
                tracing::debug!(?label, "single-shot label already fired, suppressed");
                return Vec::new();
            }
            // One post-solve reference scan is allowed: the reference
            // label re-arms and is deliberately not re-added. The tool
            // label never re-arms.
            self.fired_once.remove(&MarkerLabel::Reference);
            rearmed = true;
        }
        if label.is_single_shot() && !rearmed {
            self.fired_once.insert(label);
        }

        match label {
            MarkerLabel::Reference => match self.stage {
                Stage::AwaitingReference => self.first_reference(),
                Stage::ReferenceShown => {
                    tracing::warn!("reference admitted in ReferenceShown stage; ignoring");
                    Vec::new()
                }
                Stage::ToolEvaluated => self.second_reference(),
            },
            MarkerLabel::CorrectTool => self.correct_tool(),
            MarkerLabel::WrongToolA => {
                self.wrong_tool(now, AudioCue::WrongAnswerA, instructions::WRONG_A)
            }
            MarkerLabel::WrongToolB => {
                self.wrong_tool(now, AudioCue::WrongAnswerB, instructions::WRONG_B)
            }
        }
    }

    /// Drains delayed effects that came due at or before `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Command> {
        let mut commands = Vec::new();
        for effect in self.scheduler.poll_due(now) {
            match effect {
                ScheduledEffect::ReEnableDetection => {
                    tracing::debug!("retry pause elapsed, re-enabling detection");
                    self.pending_re_enable = None;
                    commands.push(Command::SetOverlayVisible(OverlayId::Panel, false));
                    commands.push(Command::SetOverlayVisible(OverlayId::Viewfinder, true));
                    commands.push(self.set_detection(true));
                }
                ScheduledEffect::HideSplash => {
                    tracing::debug!("splash over, session live");
                    commands.push(Command::SetOverlayVisible(OverlayId::Logo, false));
                    commands.push(Command::SetInstructionText(instructions::WELCOME.to_owned()));
                    commands.push(Command::SetOverlayVisible(OverlayId::Viewfinder, true));
                    commands.push(self.set_detection(true));
                }
                ScheduledEffect::PlayCompletion => {
                    self.push_audio(&mut commands, AudioCue::Completion);
                }
            }
        }
        commands
    }

    /// Reinitializes the session: clears all state, cancels every
    /// pending delayed effect, tears the scene down, and starts the logo
    /// splash. Idempotent; nothing scheduled before a reset survives it.
    #[tracing::instrument(skip_all, fields(session = %self.id))]
    pub fn reset(&mut self, now: DateTime<Utc>) -> Vec<Command> {
        tracing::info!("resetting scenario session");
        self.scheduler.cancel_all();
        self.pending_re_enable = None;
        self.fired_once.clear();
        self.stage = Stage::AwaitingReference;
        self.anchor = None;
        self.display_text.clear();
        self.outline = Outline::degenerate();
        self.narration.reset();

        let mut commands = vec![
            Command::SetOverlayVisible(OverlayId::ReferenceProp, false),
            Command::SetOverlayVisible(OverlayId::ReassemblyProp, false),
            Command::DestroyProp(PropId::ReassemblyProp),
            Command::SetInstructionText(String::new()),
            Command::SetOverlayVisible(OverlayId::Panel, false),
            Command::SetOverlayVisible(OverlayId::RestartButton, false),
            Command::SetOverlayVisible(OverlayId::TryAgainButton, false),
            Command::SetOverlayVisible(OverlayId::OkButton, false),
            Command::SetOverlayVisible(OverlayId::Viewfinder, false),
            Command::SetOverlayVisible(OverlayId::Logo, true),
        ];
        commands.push(self.set_detection(false));
        self.scheduler
            .schedule_after(now, self.config.splash_delay, ScheduledEffect::HideSplash);
        commands
    }

    /// User-initiated retry: close the panel and resume scanning without
    /// touching scenario progress. A pending delayed re-enable is left
    /// alone; its commands are idempotent when it later fires.
    pub fn try_again(&mut self) -> Vec<Command> {
        vec![
            Command::SetOverlayVisible(OverlayId::Panel, false),
            Command::SetOverlayVisible(OverlayId::Viewfinder, true),
            self.set_detection(true),
        ]
    }

    /// Ends the scenario: closing text and restart affordance now, the
    /// closing narration after a pause.
    pub fn complete_training(&mut self, now: DateTime<Utc>) -> Vec<Command> {
        tracing::info!("training complete");
        let commands = vec![
            Command::SetInstructionText(instructions::COMPLETE.to_owned()),
            Command::SetOverlayVisible(OverlayId::RestartButton, true),
            Command::SetOverlayVisible(OverlayId::TryAgainButton, false),
            Command::SetOverlayVisible(OverlayId::OkButton, false),
            Command::SetOverlayVisible(OverlayId::Panel, true),
            Command::SetOverlayVisible(OverlayId::Viewfinder, false),
        ];
        self.scheduler.schedule_after(
            now,
            self.config.completion_delay,
            ScheduledEffect::PlayCompletion,
        );
        commands
    }

    fn first_reference(&mut self) -> Vec<Command> {
        tracing::info!("reference detected, entering tool selection");
        self.stage = Stage::ReferenceShown;
        self.anchor = Some(self.config.reassembly_anchor);
        self.display_text = display::OBJECT_DETECTED.to_owned();

        let mut commands = vec![
            Command::SetOverlayVisible(OverlayId::Viewfinder, false),
            Command::SetOverlayVisible(OverlayId::Panel, false),
            Command::SetOverlayVisible(OverlayId::ReferenceProp, true),
            Command::PlaceProp(PropId::ReassemblyProp, self.config.reassembly_anchor),
            Command::SetOverlayVisible(OverlayId::ReassemblyProp, false),
            Command::SetInstructionText(instructions::TOOL_SELECT.to_owned()),
        ];
        self.push_audio(&mut commands, AudioCue::ToolSelect);
        commands.push(self.set_detection(false));
        commands
    }

    fn second_reference(&mut self) -> Vec<Command> {
        tracing::info!("second reference detected, showing reassembly view");
        self.display_text = display::SECOND_REFERENCE.to_owned();

        let mut commands = vec![
            Command::SetOverlayVisible(OverlayId::Viewfinder, false),
            Command::SetInstructionText(instructions::REASSEMBLY.to_owned()),
        ];
        if let Some(anchor) = self.anchor {
            commands.push(Command::PlaceProp(PropId::ReassemblyProp, anchor));
        } else {
            tracing::warn!("no anchor captured; reassembly prop shown unplaced");
        }
        commands.push(Command::SetOverlayVisible(OverlayId::ReassemblyProp, true));
        self.push_audio(&mut commands, AudioCue::Reassembly);
        commands.push(self.set_detection(false));
        commands
    }

    fn correct_tool(&mut self) -> Vec<Command> {
        tracing::info!("correct tool selected");
        self.stage = Stage::ToolEvaluated;
        self.display_text = display::CORRECT_ANSWER.to_owned();

        let mut commands = vec![
            Command::SetOverlayVisible(OverlayId::Viewfinder, false),
            Command::SetOverlayVisible(OverlayId::Panel, true),
            Command::SetInstructionText(instructions::CORRECT.to_owned()),
            Command::SetOverlayVisible(OverlayId::OkButton, true),
            Command::SetOverlayVisible(OverlayId::TryAgainButton, false),
            Command::SetOverlayVisible(OverlayId::RestartButton, false),
        ];
        self.push_audio(&mut commands, AudioCue::CorrectAnswerFx);
        self.push_audio(&mut commands, AudioCue::CorrectAnswer);
        if self.fired_once.contains(&MarkerLabel::Reference) {
            commands.push(Command::SetOverlayVisible(OverlayId::ReferenceProp, false));
        } else {
            tracing::warn!("correct tool scanned before the reference; nothing to hide");
        }
        commands.push(self.set_detection(false));
        commands
    }

    fn wrong_tool(
        &mut self,
        now: DateTime<Utc>,
        narration: AudioCue,
        instruction: &str,
    ) -> Vec<Command> {
        tracing::info!(?narration, "wrong tool selected");
        self.display_text = display::WRONG_ANSWER.to_owned();

        let mut commands = vec![
            Command::SetOverlayVisible(OverlayId::Viewfinder, false),
            Command::SetOverlayVisible(OverlayId::Panel, true),
            Command::SetInstructionText(instruction.to_owned()),
            Command::SetOverlayVisible(OverlayId::TryAgainButton, true),
        ];
        self.push_audio(&mut commands, AudioCue::WrongAnswerFx);
        self.push_audio(&mut commands, narration);
        if self.fired_once.contains(&MarkerLabel::Reference) {
            commands.push(Command::SetOverlayVisible(OverlayId::ReferenceProp, false));
        }
        commands.push(Command::SetOverlayVisible(OverlayId::ReassemblyProp, false));
        commands.push(self.set_detection(false));

        // A newer wrong answer replaces any pending re-enable, so
        // exactly one fires, timed from the newest event.
        if let Some(handle) = self.pending_re_enable.take() {
            self.scheduler.cancel(handle);
        }
        self.pending_re_enable = Some(self.scheduler.schedule_after(
            now,
            self.config.re_enable_delay,
            ScheduledEffect::ReEnableDetection,
        ));
        commands
    }

    fn set_detection(&mut self, enabled: bool) -> Command {
        self.detection_enabled = enabled;
        Command::SetDetectionEnabled(enabled)
    }

    fn push_audio(&mut self, commands: &mut Vec<Command>, cue: AudioCue) {
        if self.narration.admit(cue) {
            commands.push(Command::PlayAudio(cue));
        }
    }
}

#[cfg(test)]
mod tests {
    use arcoach_core::geometry::Point3;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::domain::command::{Command, OverlayId};
    use crate::domain::marker::{LabelVocabulary, MarkerEvent, MarkerLabel, RawDetection};
    use crate::domain::narration::AudioCue;
    use crate::domain::session::{ScenarioConfig, ScenarioSession, Stage, display};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn event_at(text: &str, origin: f32) -> MarkerEvent {
        let raw = RawDetection {
            text: text.to_owned(),
            corners: vec![
                Point3::new(origin, 1.0, 0.0),
                Point3::new(origin + 1.0, 1.0, 0.0),
                Point3::new(origin + 1.0, 0.0, 0.0),
                Point3::new(origin, 0.0, 0.0),
            ],
        };
        MarkerEvent::from_raw(raw, &LabelVocabulary::default()).unwrap()
    }

    fn event(text: &str) -> MarkerEvent {
        event_at(text, 0.0)
    }

    fn session() -> ScenarioSession {
        ScenarioSession::new(ScenarioConfig::default())
    }

    fn detection_toggles(commands: &[Command], enabled: bool) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, Command::SetDetectionEnabled(e) if *e == enabled))
            .count()
    }

    fn shows(commands: &[Command], id: OverlayId, visible: bool) -> bool {
        commands
            .iter()
            .any(|c| matches!(c, Command::SetOverlayVisible(i, v) if *i == id && *v == visible))
    }

    fn plays(commands: &[Command], cue: AudioCue) -> bool {
        commands
            .iter()
            .any(|c| matches!(c, Command::PlayAudio(p) if *p == cue))
    }

    #[test]
    fn first_reference_opens_tool_selection() {
        let mut s = session();
        let commands = s.process(start(), &event("Mocap"));

        assert_eq!(s.stage(), Stage::ReferenceShown);
        assert_eq!(s.display_text(), display::OBJECT_DETECTED);
        assert!(s.has_fired(MarkerLabel::Reference));
        assert!(shows(&commands, OverlayId::ReferenceProp, true));
        assert!(shows(&commands, OverlayId::ReassemblyProp, false));
        assert_eq!(detection_toggles(&commands, false), 1);
        assert!(!s.detection_enabled());
    }

    #[test]
    fn duplicate_reference_updates_outline_only() {
        let mut s = session();
        s.process(start(), &event("Mocap"));
        let text_before = s.display_text().to_owned();

        let commands = s.process(start(), &event_at("Mocap", 5.0));
        assert!(commands.is_empty());
        assert_eq!(s.display_text(), text_before);
        // The outline must still track the latest detection.
        let expected = event_at("Mocap", 5.0)
            .corners
            .outline(ScenarioConfig::default().outline_margin);
        assert_eq!(*s.outline(), expected);
    }

    #[test]
    fn reference_then_correct_tool_solves_the_task() {
        let mut s = session();
        s.process(start(), &event("Mocap"));
        let commands = s.process(start(), &event("Standard Wrench"));

        assert_eq!(s.stage(), Stage::ToolEvaluated);
        assert_eq!(s.display_text(), display::CORRECT_ANSWER);
        assert!(s.has_fired(MarkerLabel::Reference));
        assert!(s.has_fired(MarkerLabel::CorrectTool));
        assert!(shows(&commands, OverlayId::ReferenceProp, false));
        assert!(plays(&commands, AudioCue::CorrectAnswerFx));
    }

    #[test]
    fn correct_tool_never_re_fires() {
        let mut s = session();
        s.process(start(), &event("Mocap"));
        s.process(start(), &event("Standard Wrench"));
        let commands = s.process(start(), &event("Standard Wrench"));
        assert!(commands.is_empty());
    }

    #[test]
    fn second_reference_re_arms_but_is_not_re_added() {
        let mut s = session();
        let first = s.process(start(), &event("Mocap"));
        let solved = s.process(start(), &event("Standard Wrench"));
        let second = s.process(start(), &event("Mocap"));

        assert!(!first.is_empty());
        assert!(!solved.is_empty());
        assert!(!second.is_empty());
        // The second-reference branch, not a replay of the first.
        assert!(shows(&second, OverlayId::ReassemblyProp, true));
        assert!(!shows(&second, OverlayId::ReferenceProp, true));
        assert_eq!(s.display_text(), display::SECOND_REFERENCE);
        assert!(s.has_fired(MarkerLabel::CorrectTool));
        assert!(!s.has_fired(MarkerLabel::Reference));
    }

    #[test]
    fn second_reference_places_the_prop_at_the_anchor() {
        let mut config = ScenarioConfig::default();
        config.reassembly_anchor.position = Point3::new(2.0, 0.5, -1.0);
        let anchor = config.reassembly_anchor;
        let mut s = ScenarioSession::new(config);

        s.process(start(), &event("Mocap"));
        s.process(start(), &event("Standard Wrench"));
        let commands = s.process(start(), &event("Mocap"));

        assert!(commands.iter().any(|c| matches!(
            c,
            Command::PlaceProp(crate::domain::command::PropId::ReassemblyProp, pose)
                if *pose == anchor
        )));
    }

    #[test]
    fn wrong_answers_are_never_deduplicated() {
        let mut s = session();
        s.process(start(), &event("Mocap"));
        let first = s.process(start(), &event("Brake-fan gauge"));
        let second = s.process(start(), &event("Brake-fan gauge"));

        assert!(plays(&first, AudioCue::WrongAnswerFx));
        assert!(plays(&second, AudioCue::WrongAnswerFx));
        // The long-form narration itself plays once; the sting repeats.
        assert!(plays(&first, AudioCue::WrongAnswerA));
        assert!(!plays(&second, AudioCue::WrongAnswerA));
        assert!(shows(&second, OverlayId::TryAgainButton, true));
        assert_eq!(s.stage(), Stage::ReferenceShown);
        assert!(s.has_fired(MarkerLabel::Reference));
        assert!(!s.has_fired(MarkerLabel::CorrectTool));
    }

    #[test]
    fn wrong_answer_re_enables_detection_after_the_pause() {
        let mut s = session();
        let t0 = start();
        s.process(t0, &event("Mocap"));
        s.process(t0, &event("Torque Wrench"));
        assert!(!s.detection_enabled());

        assert!(s.tick(t0 + Duration::seconds(9)).is_empty());
        let commands = s.tick(t0 + Duration::seconds(10));
        assert_eq!(detection_toggles(&commands, true), 1);
        assert!(shows(&commands, OverlayId::Viewfinder, true));
        assert!(s.detection_enabled());
    }

    #[test]
    fn newer_wrong_answer_replaces_the_pending_re_enable() {
        let mut s = session();
        let t0 = start();
        s.process(t0, &event("Mocap"));
        s.process(t0, &event("Brake-fan gauge"));
        s.process(t0 + Duration::seconds(5), &event("Torque Wrench"));

        // The first event's deadline passes without a re-enable.
        assert!(s.tick(t0 + Duration::seconds(10)).is_empty());
        // Exactly one fires, timed from the second event.
        let commands = s.tick(t0 + Duration::seconds(15));
        assert_eq!(detection_toggles(&commands, true), 1);
        assert!(s.tick(t0 + Duration::seconds(30)).is_empty());
    }

    #[test]
    fn correct_tool_before_reference_warns_but_proceeds() {
        let mut s = session();
        let commands = s.process(start(), &event("Standard Wrench"));

        assert_eq!(s.stage(), Stage::ToolEvaluated);
        // Nothing was shown, so nothing is hidden.
        assert!(!shows(&commands, OverlayId::ReferenceProp, false));
        assert!(plays(&commands, AudioCue::CorrectAnswer));
    }

    #[test]
    fn second_reference_without_anchor_skips_placement() {
        let mut s = session();
        s.process(start(), &event("Standard Wrench"));
        let commands = s.process(start(), &event("Mocap"));

        assert!(!commands
            .iter()
            .any(|c| matches!(c, Command::PlaceProp(_, _))));
        assert!(shows(&commands, OverlayId::ReassemblyProp, true));
    }

    #[test]
    fn unknown_marker_is_outline_only() {
        let mut s = session();
        let commands = s.process(start(), &event("coffee mug"));
        assert!(commands.is_empty());
        assert_eq!(s.display_text(), "");
        assert_ne!(*s.outline(), arcoach_core::geometry::Outline::degenerate());
    }

    #[test]
    fn reset_restores_the_fresh_session_state() {
        let mut s = session();
        let t0 = start();
        s.process(t0, &event("Mocap"));
        s.process(t0, &event("Brake-fan gauge"));
        s.process(t0, &event("Standard Wrench"));

        let commands = s.reset(t0 + Duration::seconds(1));

        assert_eq!(s.stage(), Stage::AwaitingReference);
        assert!(!s.has_fired(MarkerLabel::Reference));
        assert!(!s.has_fired(MarkerLabel::CorrectTool));
        assert_eq!(s.display_text(), "");
        assert_eq!(*s.outline(), arcoach_core::geometry::Outline::degenerate());
        assert!(shows(&commands, OverlayId::Logo, true));
        // Only the splash remains scheduled.
        assert_eq!(s.pending_effects(), 1);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut s = session();
        let t0 = start();
        s.process(t0, &event("Mocap"));

        let first = s.reset(t0);
        let second = s.reset(t0);
        assert_eq!(first, second);
        assert_eq!(s.pending_effects(), 1);
    }

    #[test]
    fn reset_cancels_the_pending_re_enable() {
        let mut config = ScenarioConfig::default();
        config.splash_delay = Duration::seconds(50);
        let mut s = ScenarioSession::new(config);
        let t0 = start();
        s.process(t0, &event("Mocap"));
        s.process(t0, &event("Brake-fan gauge"));
        s.reset(t0 + Duration::seconds(1));

        // The wrong-answer deadline passes; nothing fires.
        assert!(s.tick(t0 + Duration::seconds(20)).is_empty());
    }

    #[test]
    fn splash_end_goes_live_with_the_welcome_prompt() {
        let mut s = session();
        let t0 = start();
        s.reset(t0);
        assert!(!s.detection_enabled());

        let commands = s.tick(t0 + Duration::seconds(5));
        assert!(shows(&commands, OverlayId::Logo, false));
        assert!(shows(&commands, OverlayId::Viewfinder, true));
        assert!(commands.iter().any(|c| matches!(
            c,
            Command::SetInstructionText(text)
                if text == crate::domain::command::instructions::WELCOME
        )));
        assert!(s.detection_enabled());
    }

    #[test]
    fn events_after_reset_replay_the_full_scenario() {
        let mut s = session();
        let t0 = start();
        s.process(t0, &event("Mocap"));
        s.process(t0, &event("Standard Wrench"));
        s.reset(t0);
        s.tick(t0 + Duration::seconds(5));

        // Narration is re-armed and single-shot labels fire again.
        let commands = s.process(t0 + Duration::seconds(6), &event("Mocap"));
        assert!(!commands.is_empty());
        assert_eq!(s.stage(), Stage::ReferenceShown);
        assert!(plays(&commands, AudioCue::ToolSelect));
    }

    #[test]
    fn completion_schedules_the_closing_narration() {
        let mut s = session();
        let t0 = start();
        let commands = s.complete_training(t0);
        assert!(shows(&commands, OverlayId::RestartButton, true));
        assert!(!plays(&commands, AudioCue::Completion));

        let due = s.tick(t0 + Duration::seconds(10));
        assert!(plays(&due, AudioCue::Completion));
        // Closing narration is once per session.
        let mut s2 = session();
        s2.complete_training(t0);
        let first = s2.tick(t0 + Duration::seconds(10));
        s2.complete_training(t0 + Duration::seconds(11));
        let second = s2.tick(t0 + Duration::seconds(21));
        assert!(plays(&first, AudioCue::Completion));
        assert!(!plays(&second, AudioCue::Completion));
    }

    #[test]
    fn out_of_band_detection_toggle_updates_the_mirror() {
        let mut s = session();
        s.process(start(), &event("Mocap"));
        assert!(!s.detection_enabled());
        s.acknowledge_detection(true);
        assert!(s.detection_enabled());
    }

    #[test]
    fn try_again_resumes_scanning_without_touching_progress() {
        let mut s = session();
        let t0 = start();
        s.process(t0, &event("Mocap"));
        s.process(t0, &event("Brake-fan gauge"));
        let commands = s.try_again();

        assert!(shows(&commands, OverlayId::Panel, false));
        assert!(shows(&commands, OverlayId::Viewfinder, true));
        assert!(s.detection_enabled());
        assert_eq!(s.stage(), Stage::ReferenceShown);
        assert!(s.has_fired(MarkerLabel::Reference));
    }
}
