pub mod animation;
pub mod config;
pub mod data;
pub mod direction;
pub mod drag;
pub mod error;
pub mod feedback;
pub mod session;
pub mod storage;
pub mod swiper;

use config::load_config;
use data::{load_cards, HttpCardSource, PRODUCT_IDS};
use direction::Classification;
use drag::DragEvent;
use feedback::{submit, to_thb, HttpFeedbackSink};
use session::{CommitTicket, Summary};
use storage::{load_state as load_storage_state, save_state as persist_state};
use swiper::{CommitEffects, Liveness, Swiper};

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

type SharedSwiper = Rc<RefCell<Option<Swiper>>>;
type SharedPointer = Rc<RefCell<Option<PointerTrack>>>;

#[derive(Clone, Copy, PartialEq)]
struct PointerTrack {
    pointer_id: i32,
    start_x: f64,
    start_y: f64,
    last_x: f64,
    last_y: f64,
    last_time: f64,
    velocity: f64,
}

impl PointerTrack {
    fn sample(&mut self, x: f64, y: f64, time: f64) {
        let elapsed = time - self.last_time;
        if elapsed > 0.0 {
            let step = ((x - self.last_x).powi(2) + (y - self.last_y).powi(2)).sqrt();
            self.velocity = step / elapsed;
        }
        self.last_x = x;
        self.last_y = y;
        self.last_time = time;
    }

    fn event(&self, index: usize, active: bool) -> DragEvent {
        DragEvent {
            index,
            dx: self.last_x - self.start_x,
            dy: self.last_y - self.start_y,
            active,
            velocity: self.velocity,
        }
    }
}

#[derive(PartialEq, Clone, Copy)]
enum FetchStatus {
    Loading,
    Ready,
}

#[derive(Clone)]
struct BrowserEffects {
    swiper: SharedSwiper,
    pointer: SharedPointer,
    sink: Rc<HttpFeedbackSink>,
    alive: Liveness,
    redraw: Callback<()>,
}

impl CommitEffects for BrowserEffects {
    fn submit(&self, ticket: &CommitTicket) {
        let sink = self.sink.clone();
        let card_id = ticket.card_id.clone();
        let price = ticket.price;
        let classification = ticket.classification;
        spawn_local(async move {
            submit(sink.as_ref(), &card_id, price, classification).await;
        });
    }

    fn schedule_advance(&self, ticket: CommitTicket, delay_ms: u32) {
        let swiper = self.swiper.clone();
        let pointer = self.pointer.clone();
        let alive = self.alive.clone();
        let redraw = self.redraw.clone();
        Timeout::new(delay_ms, move || {
            let advanced = swiper
                .borrow_mut()
                .as_mut()
                .map(|s| s.advance_if(&alive, &ticket))
                .unwrap_or(false);
            if !advanced {
                return;
            }
            *pointer.borrow_mut() = None;
            redraw.emit(());
        })
        .forget();
    }
}

fn schedule_hint(swiper: SharedSwiper, alive: Liveness, redraw: Callback<()>) {
    let wait = swiper
        .borrow()
        .as_ref()
        .and_then(|s| s.hint())
        .and_then(|hint| hint.current())
        .map(|step| step.delay_ms + step.duration_ms);
    let Some(wait) = wait else {
        return;
    };

    Timeout::new(wait, move || {
        if !alive.is_alive() {
            return;
        }
        let finished = swiper
            .borrow_mut()
            .as_mut()
            .map(|s| s.step_hint_if(&alive))
            .unwrap_or(false);
        redraw.emit(());
        if finished {
            if let Some(next) = load_storage_state().mark_hint_seen() {
                persist_state(&next);
            }
        } else {
            schedule_hint(swiper, alive, redraw);
        }
    })
    .forget();
}

#[function_component(App)]
fn app() -> Html {
    let status = use_state(|| FetchStatus::Loading);
    let swiper: SharedSwiper = use_mut_ref(|| None::<Swiper>);
    let pointer: SharedPointer = use_mut_ref(|| None::<PointerTrack>);
    let alive = use_memo(|_| Liveness::new(), ());
    let force = use_force_update();

    let redraw = {
        let force = force.clone();
        Callback::from(move |_: ()| force.force_update())
    };

    let effects = BrowserEffects {
        swiper: swiper.clone(),
        pointer: pointer.clone(),
        sink: Rc::new(HttpFeedbackSink::default()),
        alive: (*alive).clone(),
        redraw: redraw.clone(),
    };

    {
        let status = status.clone();
        let swiper = swiper.clone();
        let alive = (*alive).clone();
        let redraw = redraw.clone();

        use_effect_with_deps(
            move |_| {
                let hint_seen = load_storage_state().hint_seen;
                let teardown = alive.clone();

                spawn_local(async move {
                    let config = load_config().await;
                    let cards = load_cards(&HttpCardSource::default(), &PRODUCT_IDS).await;
                    if !alive.is_alive() {
                        return;
                    }
                    *swiper.borrow_mut() = Some(Swiper::new(cards, config, hint_seen));
                    status.set(FetchStatus::Ready);
                    schedule_hint(swiper, alive, redraw);
                });

                move || teardown.kill()
            },
            (),
        );
    }

    let on_press = {
        let swiper = swiper.clone();
        let effects = effects.clone();
        let redraw = redraw.clone();
        Callback::from(move |classification: Classification| {
            if let Some(swiper) = swiper.borrow_mut().as_mut() {
                swiper.press(classification, &effects);
            }
            redraw.emit(());
        })
    };

    let on_restart = {
        let swiper = swiper.clone();
        let pointer = pointer.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(swiper) = swiper.borrow_mut().as_mut() {
                swiper.restart();
            }
            *pointer.borrow_mut() = None;
            redraw.emit(());
        })
    };

    let content = match *status {
        FetchStatus::Loading => html! { <p class="loading">{ "Loading prices…" }</p> },
        FetchStatus::Ready => {
            let guard = swiper.borrow();
            let view = match guard.as_ref() {
                None => html! { <p class="error">{ "No products available." }</p> },
                Some(current) if current.is_finished() => {
                    render_summary(&current.summary(), current, on_restart)
                }
                Some(current) => render_deck(current, &swiper, &pointer, &effects, &on_press),
            };
            view
        }
    };

    html! {
        <div class="app-container">
            <main class="content single-column">
                { content }
            </main>
        </div>
    }
}

fn render_deck(
    current: &Swiper,
    swiper: &SharedSwiper,
    pointer: &SharedPointer,
    effects: &BrowserEffects,
    on_press: &Callback<Classification>,
) -> Html {
    let session = current.session();
    let cursor = session.cursor();
    let (position, total) = session.progress();

    let pointer_down = {
        let pointer = pointer.clone();
        let swiper = swiper.clone();
        Callback::from(move |event: web_sys::PointerEvent| {
            event.prevent_default();
            if pointer.borrow().is_some() {
                return;
            }
            let accepts = swiper
                .borrow()
                .as_ref()
                .map(|s| s.session().accepts_input(cursor))
                .unwrap_or(false);
            if !accepts {
                return;
            }
            if let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            {
                let _ = target.set_pointer_capture(event.pointer_id());
            }
            let x = event.client_x() as f64;
            let y = event.client_y() as f64;
            *pointer.borrow_mut() = Some(PointerTrack {
                pointer_id: event.pointer_id(),
                start_x: x,
                start_y: y,
                last_x: x,
                last_y: y,
                last_time: event.time_stamp(),
                velocity: 0.0,
            });
        })
    };

    let pointer_move = {
        let pointer = pointer.clone();
        let swiper = swiper.clone();
        let effects = effects.clone();
        Callback::from(move |event: web_sys::PointerEvent| {
            if event.buttons() == 0 {
                // Release was missed; drop the stale track and settle the card.
                let Some(state) = pointer.borrow_mut().take() else {
                    return;
                };
                let settle = DragEvent {
                    dx: 0.0,
                    dy: 0.0,
                    ..state.event(cursor, false)
                };
                if let Some(swiper) = swiper.borrow_mut().as_mut() {
                    swiper.on_drag_event(settle, &effects);
                }
                effects.redraw.emit(());
                return;
            }
            let drag = {
                let mut track = pointer.borrow_mut();
                match track.as_mut() {
                    Some(state) if state.pointer_id == event.pointer_id() => {
                        event.prevent_default();
                        state.sample(
                            event.client_x() as f64,
                            event.client_y() as f64,
                            event.time_stamp(),
                        );
                        Some(state.event(cursor, true))
                    }
                    _ => None,
                }
            };
            if let Some(drag) = drag {
                if let Some(swiper) = swiper.borrow_mut().as_mut() {
                    swiper.on_drag_event(drag, &effects);
                }
                effects.redraw.emit(());
            }
        })
    };

    let pointer_end = {
        let pointer = pointer.clone();
        let swiper = swiper.clone();
        let effects = effects.clone();
        Callback::from(move |event: web_sys::PointerEvent| {
            let track = *pointer.borrow();
            let Some(mut state) = track else {
                return;
            };
            if state.pointer_id != event.pointer_id() {
                return;
            }
            if let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            {
                let _ = target.release_pointer_capture(event.pointer_id());
            }
            *pointer.borrow_mut() = None;
            let released = if event.type_() == "pointercancel" {
                DragEvent {
                    dx: 0.0,
                    dy: 0.0,
                    ..state.event(cursor, false)
                }
            } else {
                state.sample(
                    event.client_x() as f64,
                    event.client_y() as f64,
                    event.time_stamp(),
                );
                state.event(cursor, false)
            };
            if let Some(swiper) = swiper.borrow_mut().as_mut() {
                swiper.on_drag_event(released, &effects);
            }
            effects.redraw.emit(());
        })
    };

    let cards = session
        .cards()
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let style = current
                .animator()
                .visual(index)
                .map(|visual| visual.style())
                .unwrap_or_default();
            let is_current = index == cursor;
            let badge = current.indicator().filter(|_| is_current);
            let handlers = if is_current {
                (
                    Some(pointer_down.clone()),
                    Some(pointer_move.clone()),
                    Some(pointer_end.clone()),
                )
            } else {
                (None, None, None)
            };

            html! {
                <div key={card.id.clone()}
                    class={classes!("card", is_current.then_some("active-card"))}
                    style={style}
                    onpointerdown={handlers.0}
                    onpointermove={handlers.1}
                    onpointerup={handlers.2.clone()}
                    onpointercancel={handlers.2}>
                    <img class="card-image" src={card.image_ref.clone()} alt={format!("Product {}", card.id)} />
                    <p class="card-price">{ format!("฿{:.2}", to_thb(card.price)) }</p>
                    { render_badge(badge) }
                </div>
            }
        })
        .collect::<Html>();

    let hint = current
        .hint()
        .map(|hint| html! { <div class="swipe-hint" style={hint.style()}>{ "✋" }</div> })
        .unwrap_or_else(|| html! {});

    let buttons = [
        Classification::Reject,
        Classification::TooLow,
        Classification::TooHigh,
        Classification::Fair,
    ]
    .into_iter()
    .map(|classification| {
        let on_press = on_press.clone();
        html! {
            <button class={classes!("feedback-button", classification.as_str())}
                aria-label={classification.label()}
                onclick={Callback::from(move |_: MouseEvent| on_press.emit(classification))}>
                { classification.label() }
            </button>
        }
    })
    .collect::<Html>();

    html! {
        <div class="deck">
            <div class="progress">{ format!("{} / {}", position, total) }</div>
            { hint }
            <div class="card-stack">{ cards }</div>
            <div class="button-row">{ buttons }</div>
        </div>
    }
}

fn render_badge(indicator: Option<Classification>) -> Html {
    match indicator {
        Some(classification) => html! {
            <div class={classes!("feedback-badge", classification.as_str())}>
                { classification.label() }
            </div>
        },
        None => html! {},
    }
}

fn render_summary(summary: &Summary, current: &Swiper, on_restart: Callback<MouseEvent>) -> Html {
    let items = summary
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            html! {
                <li key={index}>
                    <span>{ format!("Product {}", entry.card_id) }</span>
                    <span class="summary-price">{ format!("฿{:.2}", to_thb(entry.price)) }</span>
                    <span class={classes!("summary-label", entry.classification.as_str())}>
                        { entry.label }
                    </span>
                </li>
            }
        })
        .collect::<Html>();

    html! {
        <div class="summary">
            <h2>{ "Thank you for your feedback!" }</h2>
            <p>{ format!("You rated {} of {} products.", summary.total(), current.session().cards().len()) }</p>
            <button class="restart-button" onclick={on_restart}>{ "Start Again" }</button>
            if summary.total() > 0 {
                <ul class="summary-list">{ items }</ul>
            }
        </div>
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
