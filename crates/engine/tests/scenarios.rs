//! End-to-end flows through the public API: a view, a manager installed from
//! settings, chips found on screen, and dates written back.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chipmark_engine::{
	ChipConfig, DatePicker, DecorationManager, EditOutcome, EditorHost, EngineError, MarkdownView, PatternMatcher,
	PickerOutcome, PickerRequest, SharedView, SurfaceFormat, date_chip_extension, pick_and_apply,
};
use chipmark_primitives::{BoxFutureLocal, Selection};
use rstest::rstest;
use tokio::sync::oneshot;

fn install(text: &str, settings: &str) -> (Rc<RefCell<MarkdownView>>, DecorationManager) {
	let _ = tracing_subscriber::fmt::try_init();
	let view = Rc::new(RefCell::new(MarkdownView::new(text)));
	let shared: SharedView = view.clone();
	let config = ChipConfig::from_toml(settings).unwrap();
	let manager = date_chip_extension(&shared, &config).unwrap();
	(view, manager)
}

fn drawn(manager: &DecorationManager) -> Vec<String> {
	manager.render().into_iter().map(|rendered| rendered.chip.value().to_string()).collect()
}

/// A picker answered through a channel, recording what it was opened with.
struct ChannelPicker {
	answer: RefCell<Option<oneshot::Receiver<PickerOutcome>>>,
	requests: RefCell<Vec<PickerRequest>>,
}

impl ChannelPicker {
	fn new() -> (Self, oneshot::Sender<PickerOutcome>) {
		let (tx, rx) = oneshot::channel();
		let picker = Self {
			answer: RefCell::new(Some(rx)),
			requests: RefCell::new(Vec::new()),
		};
		(picker, tx)
	}
}

impl DatePicker for ChannelPicker {
	fn open(&self, request: PickerRequest) -> BoxFutureLocal<'static, PickerOutcome> {
		self.requests.borrow_mut().push(request);
		let answer = self.answer.borrow_mut().take();
		Box::pin(async move {
			match answer {
				Some(rx) => rx.await.unwrap_or(PickerOutcome::Cancelled),
				None => PickerOutcome::Cancelled,
			}
		})
	}
}

#[test]
fn picking_a_new_due_date() {
	let (view, mut manager) = install("Buy milk 📅 2024-01-15", "");
	let chip = manager.chip_at(12).unwrap();

	let outcome = manager.edit_protocol().set_value(&chip, "2024-01-20");
	assert!(outcome.is_applied());
	assert_eq!(view.borrow().text(), "Buy milk 📅 2024-01-20");

	manager.sync(Instant::now());
	assert_eq!(drawn(&manager), ["2024-01-20"]);
}

#[test]
fn clearing_a_dataview_field() {
	let (view, mut manager) = install("Task [due:: 2024-01-15]", r#"format = "dataview""#);
	let chip = manager.chip_at(10).unwrap();

	assert!(manager.edit_protocol().clear(&chip).is_applied());
	assert_eq!(view.borrow().text(), "Task ");

	manager.sync(Instant::now());
	assert!(manager.decorations().is_empty());
}

#[test]
fn large_insert_above_only_changes_the_token_line() {
	let (view, mut manager) = install("# Notes\n📅 2024-01-01\n- [ ] tail", "");
	let chip = manager.chip_at(9).unwrap();

	let mut filler = "x".repeat(500);
	filler.push('\n');
	view.borrow_mut().insert(0, &filler).unwrap();
	let before = view.borrow().text();

	let outcome = manager.edit_protocol().set_value(&chip, "2024-06-30");
	assert!(matches!(outcome, EditOutcome::Applied { span, .. } if span.start() == 509));
	let after = view.borrow().text();

	let changed: Vec<usize> = before
		.lines()
		.zip(after.lines())
		.enumerate()
		.filter(|(_, (old, new))| old != new)
		.map(|(number, _)| number)
		.collect();
	assert_eq!(changed, [2]);
	assert_eq!(after.lines().nth(2), Some("📅 2024-06-30"));

	manager.sync(Instant::now());
	assert_eq!(drawn(&manager), ["2024-06-30"]);
}

#[test]
fn selecting_a_chip_reveals_its_text() {
	let (view, mut manager) = install("Call mom ⏳ 2024-02-01\nnext line", "");
	let t0 = Instant::now();
	assert_eq!(drawn(&manager), ["2024-02-01"]);

	view.borrow_mut().set_selection(Selection::single(8, 14));
	manager.sync(t0);
	assert!(drawn(&manager).is_empty());

	let next = view.borrow().line(1).unwrap().start;
	view.borrow_mut().set_selection(Selection::point(next));
	manager.sync(t0 + Duration::from_millis(100));
	assert_eq!(drawn(&manager), ["2024-02-01"]);
}

#[rstest]
#[case(SurfaceFormat::Marked, "- [ ] pay rent 🛫 2024-01-15 #home")]
#[case(SurfaceFormat::Bracketed, "- [ ] pay rent [start:: 2024-01-15] #home")]
fn written_dates_parse_back(#[case] format: SurfaceFormat, #[case] text: &str) {
	let settings = format!("format = \"{}\"", format.setting_name());
	let (view, manager) = install(text, &settings);
	let chip = manager.decorations().iter().next().unwrap().clone();

	assert!(manager.edit_protocol().set_value(&chip, "2030-12-31").is_applied());

	let text = view.borrow().text();
	let matcher = PatternMatcher::new(format);
	let tokens: Vec<_> = matcher.matches(&text).collect();
	assert_eq!(tokens.len(), 1);
	assert_eq!(tokens[0].marker, chip.marker());
	assert_eq!(tokens[0].value, "2030-12-31");
	assert!(text.ends_with(" #home"));
}

#[test]
fn disabled_setting_installs_nothing() {
	let view = Rc::new(RefCell::new(MarkdownView::new("📅 2024-01-15")));
	let shared: SharedView = view;
	let config = ChipConfig::from_toml("enabled = false").unwrap();
	assert!(date_chip_extension(&shared, &config).is_none());
}

#[test]
fn settings_select_the_format() {
	let text = "a 📅 2024-01-15 b [due:: 2024-01-16]";
	let (_view, tasks) = install(text, r#"format = "tasks""#);
	let (_view, dataview) = install(text, r#"format = "dataview""#);
	assert_eq!(drawn(&tasks), ["2024-01-15"]);
	assert_eq!(drawn(&dataview), ["2024-01-16"]);
}

#[tokio::test]
async fn picker_result_lands_after_concurrent_edits() {
	let (view, mut manager) = install("Buy milk 📅 2024-01-15", "");
	let chip = manager.chip_at(12).unwrap();
	let protocol = manager.edit_protocol();
	let (picker, answer) = ChannelPicker::new();

	let user = async {
		tokio::task::yield_now().await;
		view.borrow_mut().insert(0, "# Inbox\n").unwrap();
		view.borrow_mut().insert(8, "- [ ] ").unwrap();
		answer.send(PickerOutcome::Picked("2024-01-20".into())).unwrap();
	};
	let (outcome, ()) = tokio::join!(pick_and_apply(&picker, &protocol, &chip), user);

	assert!(matches!(outcome, Some(EditOutcome::Applied { revision: 3, .. })));
	assert_eq!(view.borrow().text(), "# Inbox\n- [ ] Buy milk 📅 2024-01-20");
	assert_eq!(
		picker.requests.borrow().as_slice(),
		[PickerRequest {
			current: Some("2024-01-15".into()),
			marker: "📅".into(),
		}]
	);

	manager.sync(Instant::now());
	assert_eq!(drawn(&manager), ["2024-01-20"]);
}

#[tokio::test]
async fn picker_result_is_dropped_when_the_token_is_gone() {
	let (view, manager) = install("Buy milk 📅 2024-01-15", "");
	let chip = manager.chip_at(12).unwrap();
	let protocol = manager.edit_protocol();
	let (picker, answer) = ChannelPicker::new();

	let user = async {
		tokio::task::yield_now().await;
		view.borrow_mut().delete(8, 21).unwrap();
		answer.send(PickerOutcome::Picked("2024-01-20".into())).unwrap();
	};
	let (outcome, ()) = tokio::join!(pick_and_apply(&picker, &protocol, &chip), user);

	assert!(matches!(outcome, Some(EditOutcome::Skipped(EngineError::Unresolved { .. }))));
	assert_eq!(view.borrow().text(), "Buy milk");
}

#[tokio::test]
async fn cancelled_picker_changes_nothing() {
	let (view, manager) = install("Buy milk 📅 2024-01-15", "");
	let chip = manager.chip_at(12).unwrap();
	let (picker, answer) = ChannelPicker::new();
	drop(answer);

	let outcome = pick_and_apply(&picker, &manager.edit_protocol(), &chip).await;
	assert_eq!(outcome, None);
	assert_eq!(view.borrow().revision(), 0);
}
