//! Browser front end: draws the desk with Leptos and drives its timers.

use std::collections::HashMap;

use gloo_net::http::Request;
use gloo_timers::callback::{Interval, Timeout};
use leptos::*;
use wasm_bindgen::JsValue;
use web_sys::{SpeechSynthesisUtterance, Storage};

use crate::challenge::{Countdown, Phase};
use crate::desk::{
    DeskController, DeskEvent, EMPTY_DESK_MESSAGE, Removal, SUCCESS_TOAST, TOAST_DURATION_MS,
};
use crate::flip::{EXPLODE_DURATION_MS, REPACK_DURATION_MS};
use crate::modal::ModalSession;
use crate::prefs::{GroupWord, KeyValueStore, Preferences, PrefsError};
use crate::{Book, CardMotion, CardVisual, CoinLedger, Deck};

const API_BASE: &str = match option_env!("WORDCARDS_API_BASE") {
    Some(base) => base,
    None => "",
};
const WORD_GROUP: &str = "生词本";
const FALLBACK_WIDTH: f64 = 960.0;

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = JsValue::from_str(&format!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_logging() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

/// `localStorage`, when the browser grants access to it.
struct LocalStore(Option<Storage>);

impl LocalStore {
    fn open() -> Self {
        Self(leptos::window().local_storage().ok().flatten())
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let write_error = |message: String| PrefsError::Write {
            key: key.to_string(),
            message,
        };
        let storage = self
            .0
            .as_ref()
            .ok_or_else(|| write_error("localStorage unavailable".to_string()))?;

        storage
            .set_item(key, value)
            .map_err(|error| write_error(format!("{error:?}")))
    }
}

fn prefs() -> Preferences<LocalStore> {
    Preferences::new(LocalStore::open())
}

async fn fetch_words(book: Book) -> Result<Deck, String> {
    let url = format!("{API_BASE}/get_words?book={}", book.key());
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|error| error.to_string())?;

    if !response.ok() {
        return Err(format!("word source answered {}", response.status()));
    }

    response
        .text()
        .await
        .map(|body| Deck::parse_json(&body))
        .map_err(|error| error.to_string())
}

fn speak_word(word: &str) {
    let Ok(synthesis) = leptos::window().speech_synthesis() else {
        log::warn!("speech synthesis is not available");
        return;
    };

    match SpeechSynthesisUtterance::new_with_text(word) {
        Ok(utterance) => {
            utterance.set_lang("en-US");
            utterance.set_rate(1.0);
            synthesis.speak(&utterance);
        }
        Err(error) => log::warn!("failed to build utterance: {error:?}"),
    }
}

fn card_style(card: &CardVisual) -> String {
    let mut style = format!(
        "left:{}px;top:{}px;background-color:{};transform:{};",
        card.position.left,
        card.position.top,
        card.color.hex(),
        card.transform_css()
    );
    if let Some(transition) = card.transition_css() {
        style.push_str(&format!("transition:{transition};"));
    }
    style
}

#[derive(Debug, Clone, PartialEq)]
struct Toast {
    message: String,
    kind: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
struct ModalSnapshot {
    word: String,
    phonetic: String,
    definition: String,
    color: &'static str,
    definition_visible: bool,
    word_visible: bool,
    challenge: Option<ChallengeSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ChallengeSnapshot {
    phase: Phase,
    seconds_left: u32,
    message: Option<&'static str>,
}

impl From<&ModalSession> for ModalSnapshot {
    fn from(session: &ModalSession) -> Self {
        Self {
            word: session.word().word.clone(),
            phonetic: session.word().phonetic_text().to_string(),
            definition: session.word().definition_text().to_string(),
            color: session.color().hex(),
            definition_visible: session.definition_visible(),
            word_visible: session.word_visible(),
            challenge: session
                .challenge()
                .filter(|challenge| !challenge.is_closed())
                .map(|challenge| ChallengeSnapshot {
                    phase: challenge.phase(),
                    seconds_left: challenge.seconds_left(),
                    message: challenge.message(),
                }),
        }
    }
}

/// Signals and timer slots shared by every event handler on the page.
#[derive(Clone, Copy)]
struct DeskHandles {
    desk: RwSignal<DeskController>,
    book: RwSignal<Book>,
    toast: RwSignal<Option<Toast>>,
    toast_seq: StoredValue<u32>,
    spell_input: RwSignal<String>,
    countdown: StoredValue<Option<Interval>>,
    enter_listener: StoredValue<Option<WindowListenerHandle>>,
    desk_ref: NodeRef<html::Div>,
    input_ref: NodeRef<html::Input>,
}

impl DeskHandles {
    fn run(self, step: impl FnOnce(&mut DeskController) -> DeskEvent) {
        let event = self.desk.try_update(step).unwrap_or(DeskEvent::Nothing);
        self.handle(event);
    }

    fn handle(self, event: DeskEvent) {
        match event {
            DeskEvent::Nothing | DeskEvent::Redraw => {}
            DeskEvent::CountdownStarted(countdown) => self.start_countdown(countdown),
            DeskEvent::SessionClosed => self.stop_challenge(),
            DeskEvent::Removed(removal) => {
                self.stop_challenge();
                self.play_removal(removal);
            }
            DeskEvent::Won {
                balance,
                exploding,
                removal,
            } => {
                self.stop_challenge();
                if let Err(error) = prefs().set_coins(balance) {
                    log::warn!("coin balance not saved: {error}");
                }
                self.show_toast(SUCCESS_TOAST, "success");

                if let Some(removal) = removal {
                    self.play_removal(removal);
                }
                if let Some(card) = exploding {
                    Timeout::new(EXPLODE_DURATION_MS, move || {
                        let removal = self
                            .desk
                            .try_update(|desk| desk.finish_explosion(&card))
                            .flatten();
                        if let Some(removal) = removal {
                            self.play_removal(removal);
                        }
                    })
                    .forget();
                }
            }
        }

        if self.desk.with_untracked(|desk| desk.inspector().countdown().is_none()) {
            self.stop_challenge();
        }
    }

    fn load_book(self, book: Book) {
        self.book.set(book);
        if let Err(error) = prefs().set_last_book(book) {
            log::warn!("book choice not saved: {error}");
        }

        wasm_bindgen_futures::spawn_local(async move {
            let deck = match fetch_words(book).await {
                Ok(deck) => deck,
                Err(message) => {
                    log::error!("failed to load {book}: {message}");
                    Deck::empty()
                }
            };

            // A newer selection owns the desk now.
            if self.book.get_untracked() != book {
                return;
            }

            self.run(|desk| desk.load(book, deck));
        });
    }

    fn start_countdown(self, countdown: Countdown) {
        self.stop_countdown();

        match countdown {
            Countdown::Memorize => self.listen_for_enter(),
            Countdown::Spell => {
                self.spell_input.set(String::new());
                if let Some(input) = self.input_ref.get_untracked() {
                    let _ = input.focus();
                }
            }
        }

        let interval = Interval::new(1_000, move || self.run(DeskController::tick));
        self.countdown.set_value(Some(interval));
    }

    fn stop_countdown(self) {
        let running = self.countdown.try_update_value(Option::take).flatten();
        if let Some(interval) = running {
            let callback = interval.cancel();
            // We may be inside this interval's own callback.
            Timeout::new(0, move || drop(callback)).forget();
        }
    }

    fn listen_for_enter(self) {
        if self.enter_listener.with_value(Option::is_some) {
            return;
        }

        let handle = window_event_listener(ev::keydown, move |event| {
            if event.key() != "Enter" {
                return;
            }
            let input = self.spell_input.get_untracked();
            self.run(|desk| desk.enter(&input));
        });
        self.enter_listener.set_value(Some(handle));
    }

    fn stop_challenge(self) {
        self.stop_countdown();
        if let Some(handle) = self.enter_listener.try_update_value(Option::take).flatten() {
            handle.remove();
        }
    }

    fn play_removal(self, removal: Removal) {
        let Removal::Animated(plan) = removal else {
            return;
        };

        if plan.sliding_count() == 0 {
            self.desk.update(DeskController::settle_repack);
            return;
        }

        // Inverted offsets are in the DOM now; force a layout so the browser
        // sees them before the transition is switched on.
        if let Some(desk) = self.desk_ref.get_untracked() {
            let _ = desk.offset_height();
        }
        self.desk.update(DeskController::play_repack);

        Timeout::new(REPACK_DURATION_MS, move || {
            self.desk.update(DeskController::settle_repack);
        })
        .forget();
    }

    fn show_toast(self, message: impl Into<String>, kind: &'static str) {
        let seq = self.toast_seq.with_value(|seq| seq.wrapping_add(1));
        self.toast_seq.set_value(seq);
        self.toast.set(Some(Toast {
            message: message.into(),
            kind,
        }));

        Timeout::new(TOAST_DURATION_MS, move || {
            if self.toast_seq.get_value() == seq {
                self.toast.set(None);
            }
        })
        .forget();
    }

    fn speak(self) {
        let now = js_sys::Date::now();
        if let Some(word) = self.desk.try_update(|desk| desk.speak(now)).flatten() {
            speak_word(&word);
        }
    }

    fn save_to_group(self) {
        let Some(entry) = self.desk.with_untracked(|desk| {
            desk.inspector().session().map(|session| GroupWord {
                word: session.word().word.clone(),
                definition: session.word().definition_text().to_string(),
            })
        }) else {
            return;
        };

        match prefs().add_to_group(WORD_GROUP, entry) {
            Ok(true) => self.show_toast(format!("已加入{WORD_GROUP}"), "info"),
            Ok(false) => self.show_toast(format!("已在{WORD_GROUP}中"), "info"),
            Err(error) => log::warn!("word group not saved: {error}"),
        }
    }

    fn measure_width(self) -> f64 {
        self.desk_ref
            .get_untracked()
            .map(|desk| f64::from(desk.client_width()))
            .filter(|width| *width > 0.0)
            .unwrap_or(FALLBACK_WIDTH)
    }
}

#[component]
fn DeskCard(
    word: String,
    by_word: Memo<HashMap<String, CardVisual>>,
    handles: DeskHandles,
) -> impl IntoView {
    let lookup = word.clone();
    let visual = create_memo(move |_| by_word.with(|cards| cards.get(&lookup).cloned()));
    let click_word = word.clone();

    view! {
        <div
            class=move || match visual.get().map(|card| card.motion) {
                Some(CardMotion::Exploding) => "word-card card-explode",
                _ => "word-card",
            }
            style=move || visual.get().map(|card| card_style(&card)).unwrap_or_default()
            on:click=move |event: ev::MouseEvent| {
                event.stop_propagation();
                let word = click_word.clone();
                handles.run(move |desk| desk.open_card(&word));
            }
        >
            {word}
        </div>
    }
}

#[component]
fn ChallengePanel(modal: Memo<Option<ModalSnapshot>>, handles: DeskHandles) -> impl IntoView {
    let challenge = move || modal.with(|m| m.as_ref().and_then(|m| m.challenge));
    let phase = move || challenge().map(|c| c.phase);
    let seconds = move || format!("{}s", challenge().map(|c| c.seconds_left).unwrap_or(0));
    let target = move || modal.with(|m| m.as_ref().map(|m| m.word.clone()).unwrap_or_default());

    view! {
        <div class="challenge-area" on:click=|event: ev::MouseEvent| event.stop_propagation()>
            <Show when=move || phase() == Some(Phase::Memorize)>
                <div class="memory-stage">
                    <p class="stage-title">"记住这个单词"</p>
                    <p class="memory-word">{target}</p>
                    <p class="stage-timer">{seconds}</p>
                    <div class="stage-actions">
                        <button
                            type="button"
                            class="btn btn-primary"
                            on:click=move |_| handles.run(DeskController::start_spelling)
                        >
                            "开始拼写"
                        </button>
                        <button
                            type="button"
                            class="btn"
                            on:click=move |_| handles.run(DeskController::exit_challenge)
                        >
                            "退出挑战"
                        </button>
                    </div>
                </div>
            </Show>
            <Show when=move || phase() == Some(Phase::Spell)>
                <div class="spell-stage">
                    <p class="stage-title">"拼写刚才的单词"</p>
                    <p class="stage-timer">{seconds}</p>
                    <input
                        class="spell-input"
                        type="text"
                        autocomplete="off"
                        node_ref=handles.input_ref
                        prop:value=move || handles.spell_input.get()
                        on:input=move |event| handles.spell_input.set(event_target_value(&event))
                    />
                    <p class="spell-message">
                        {move || challenge().and_then(|c| c.message).unwrap_or("")}
                    </p>
                    <div class="stage-actions">
                        <button
                            type="button"
                            class="btn btn-primary"
                            on:click=move |_| {
                                let input = handles.spell_input.get_untracked();
                                handles.run(|desk| desk.submit(&input));
                            }
                        >
                            "提交"
                        </button>
                        <button
                            type="button"
                            class="btn"
                            on:click=move |_| handles.run(DeskController::exit_challenge)
                        >
                            "退出挑战"
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn CardModal(modal: Memo<Option<ModalSnapshot>>, handles: DeskHandles) -> impl IntoView {
    let text = move |pick: fn(&ModalSnapshot) -> String| {
        modal.with(|m| m.as_ref().map(pick).unwrap_or_default())
    };
    let flag = move |pick: fn(&ModalSnapshot) -> bool| {
        modal.with(|m| m.as_ref().is_some_and(pick))
    };
    let in_challenge = move || {
        modal.with(|m| m.as_ref().is_some_and(|m| m.challenge.is_some()))
    };
    let background = move || {
        let color = modal.with(|m| m.as_ref().map(|m| m.color).unwrap_or("#fff"));
        format!("background-color:{color};")
    };

    view! {
        <Show when=move || modal.with(Option::is_some)>
            <div class="modal-mask" on:click=move |_| handles.run(DeskController::dismiss_mask)>
                <div
                    class="modal-card"
                    style=background
                    on:click=move |event: ev::MouseEvent| {
                        event.stop_propagation();
                        let now = js_sys::Date::now();
                        handles.run(|desk| desk.tap(now));
                    }
                >
                    <div class="modal-word" class:hidden=move || !flag(|m| m.word_visible)>
                        {move || text(|m| m.word.clone())}
                    </div>
                    <div class="modal-phonetic" class:hidden=move || !flag(|m| m.word_visible)>
                        {move || text(|m| m.phonetic.clone())}
                    </div>
                    <div
                        class="modal-definition"
                        class:hidden=move || !flag(|m| m.definition_visible)
                    >
                        {move || text(|m| m.definition.clone())}
                    </div>
                    <Show when=move || !in_challenge()>
                        <div class="modal-actions">
                            <button
                                type="button"
                                class="btn"
                                on:click=move |event: ev::MouseEvent| {
                                    event.stop_propagation();
                                    handles.speak();
                                }
                            >
                                "发音"
                            </button>
                            <button
                                type="button"
                                class="btn"
                                on:click=move |event: ev::MouseEvent| {
                                    event.stop_propagation();
                                    handles.run(DeskController::toggle_definition);
                                }
                            >
                                "释义"
                            </button>
                            <button
                                type="button"
                                class="btn"
                                on:click=move |event: ev::MouseEvent| {
                                    event.stop_propagation();
                                    handles.save_to_group();
                                }
                            >
                                "收藏"
                            </button>
                            <button
                                type="button"
                                class="btn btn-primary"
                                on:click=move |event: ev::MouseEvent| {
                                    event.stop_propagation();
                                    handles.run(DeskController::start_challenge);
                                }
                            >
                                "挑战"
                            </button>
                        </div>
                    </Show>
                    <Show when=in_challenge>
                        <ChallengePanel modal=modal handles=handles />
                    </Show>
                </div>
            </div>
        </Show>
    }
}

#[component]
fn BookPanel(open: RwSignal<bool>, handles: DeskHandles) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <div class="panel-mask" on:click=move |_| open.set(false)>
                <div class="books-panel" on:click=|event: ev::MouseEvent| event.stop_propagation()>
                    <div class="panel-header">
                        <span>"全部词书"</span>
                        <button type="button" class="close-panel" on:click=move |_| open.set(false)>
                            "×"
                        </button>
                    </div>
                    <ul class="book-list">
                        {Book::ALL
                            .into_iter()
                            .map(|book| {
                                view! {
                                    <li
                                        class="book-item"
                                        class:active=move || handles.book.get() == book
                                        on:click=move |_| {
                                            handles.load_book(book);
                                            open.set(false);
                                        }
                                    >
                                        {book.label()}
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </div>
            </div>
        </Show>
    }
}

#[component]
fn App() -> impl IntoView {
    let saved = prefs();
    let first_book = saved.last_book();
    let ledger = CoinLedger::with_balance(saved.coins());

    let handles = DeskHandles {
        desk: create_rw_signal(DeskController::from_entropy(first_book, ledger, FALLBACK_WIDTH)),
        book: create_rw_signal(first_book),
        toast: create_rw_signal(None),
        toast_seq: store_value(0),
        spell_input: create_rw_signal(String::new()),
        countdown: store_value(None),
        enter_listener: store_value(None),
        desk_ref: create_node_ref::<html::Div>(),
        input_ref: create_node_ref::<html::Input>(),
    };
    let books_open = create_rw_signal(false);

    let cards = create_memo(move |_| handles.desk.with(|desk| desk.view().cards().to_vec()));
    let by_word = create_memo(move |_| {
        cards.with(|list| {
            list.iter()
                .map(|card| (card.word.clone(), card.clone()))
                .collect::<HashMap<_, _>>()
        })
    });
    let modal = create_memo(move |_| {
        handles
            .desk
            .with(|desk| desk.inspector().session().map(ModalSnapshot::from))
    });
    let desk_height = move || handles.desk.with(|desk| desk.view().height());

    create_effect(move |_| {
        if handles.desk_ref.get().is_some() {
            let width = handles.measure_width();
            handles.desk.update(|desk| desk.resize(width));
        }
    });

    let _ = window_event_listener(ev::resize, move |_| {
        let width = handles.measure_width();
        handles.desk.update(|desk| desk.resize(width));
    });

    handles.load_book(first_book);

    view! {
        <div class="app">
            <header class="top-bar">
                <div class="brand">"单词卡片桌"</div>
                <div class="book-controls">
                    <select
                        class="book-select"
                        prop:value=move || handles.book.get().key()
                        on:change=move |event| match event_target_value(&event).parse::<Book>() {
                            Ok(book) => handles.load_book(book),
                            Err(error) => log::warn!("ignoring book selection: {error}"),
                        }
                    >
                        {Book::ALL
                            .into_iter()
                            .map(|book| view! { <option value=book.key()>{book.label()}</option> })
                            .collect_view()}
                    </select>
                    <button type="button" class="btn" on:click=move |_| books_open.set(true)>
                        "更多词书"
                    </button>
                    <button
                        type="button"
                        class="btn"
                        on:click=move |_| handles.desk.update(DeskController::refresh)
                    >
                        "刷新"
                    </button>
                </div>
                <div class="coins">
                    "🪙 "
                    <span class="coin-amount">
                        {move || handles.desk.with(DeskController::balance)}
                    </span>
                </div>
            </header>

            <div
                class="card-desk"
                node_ref=handles.desk_ref
                style=move || format!("min-height:{}px;", desk_height())
            >
                <Show
                    when=move || cards.with(|list| !list.is_empty())
                    fallback=|| view! { <div class="desk-placeholder">{EMPTY_DESK_MESSAGE}</div> }
                >
                    <For
                        each=move || cards.get()
                        key=|card| card.word.clone()
                        children=move |card: CardVisual| {
                            view! { <DeskCard word=card.word by_word=by_word handles=handles /> }
                        }
                    />
                </Show>
            </div>

            <CardModal modal=modal handles=handles />
            <BookPanel open=books_open handles=handles />

            {move || {
                handles.toast.get().map(|toast| {
                    view! { <div class=format!("toast toast-{}", toast.kind)>{toast.message}</div> }
                })
            }}
        </div>
    }
}

/// Mounts the desk into the page body.
pub fn start() {
    console_error_panic_hook::set_once();
    init_logging();
    mount_to_body(|| view! { <App /> });
}
