mod animated;
mod canvas;
mod sections;
mod stage;

use canvas::ParticleCanvas;
use motion_portfolio::{
    config::MotionConfig,
    content::Portfolio,
    logging::{log_event, LogLevel},
    motion::{ResourceKind, Scope, ScrollSignalBus, SectionRect},
};
use sections::{About, Contact, ExperienceTimeline, Projects, Skills};
use stage::{element_by_id, listen, scroll_metrics, section_rect, FrameLoop, MotionContext};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeSet,
    rc::Rc,
};
use wasm_bindgen::JsCast;
use web_sys::{window, EventTarget, HtmlElement};
use yew::prelude::*;

const NAV_SECTIONS: [(&str, &str); 5] = [
    ("about", "About"),
    ("skills", "Skills"),
    ("projects", "Projects"),
    ("experience", "Experience"),
    ("contact", "Contact"),
];

type ActiveSections = BTreeSet<String>;

/// Feeds one scroll sample to the bus and publishes the nav set when any
/// section crossed the band.
fn sample_scroll(motion: &MotionContext, bus: &RefCell<ScrollSignalBus>, active: &UseStateHandle<ActiveSections>) {
    let Some(metrics) = scroll_metrics() else {
        return;
    };
    let rects: Vec<(&str, SectionRect)> = NAV_SECTIONS
        .iter()
        .filter_map(|(id, _)| element_by_id(id).map(|section| (*id, section_rect(&section))))
        .collect();

    let mut bus = bus.borrow_mut();
    let transitions = bus.observe(metrics, &rects);
    motion.with(|stage| stage.request_reveal_check());

    if !transitions.is_empty() {
        active.set(bus.nav().active().map(String::from).collect());
    }
}

fn mount_page(motion: &MotionContext, active: UseStateHandle<ActiveSections>, progress_bar: NodeRef) -> Scope {
    let config = motion.config();
    let mut scope = Scope::new("page", config.log);
    let bus = Rc::new(RefCell::new(ScrollSignalBus::default()));

    let sample: Rc<dyn Fn()> = {
        let motion = motion.clone();
        let bus = Rc::clone(&bus);
        Rc::new(move || sample_scroll(&motion, &bus, &active))
    };

    if let Some(win) = window() {
        let target: &EventTarget = win.unchecked_ref();
        for event in ["scroll", "resize"] {
            let sample = Rc::clone(&sample);
            listen(&mut scope, target, event, move |_| sample());
        }
    }
    sample();

    let max_delta_seconds = config.max_frame_delta_ms / 1_000.0;
    let last_timestamp = Cell::new(None::<f64>);
    let motion_for_frame = motion.clone();
    let frame_loop = FrameLoop::start(scope.token(), move |timestamp| {
        let dt = last_timestamp
            .replace(Some(timestamp))
            .map(|previous| ((timestamp - previous) / 1_000.0).clamp(0.0, max_delta_seconds))
            .unwrap_or(0.0);

        motion_for_frame.with(|stage| stage.frame(dt));
        let progress = bus.borrow_mut().advance(dt);
        if let Some(bar) = progress_bar.cast::<HtmlElement>() {
            let _ = bar.style().set_property("transform", &format!("scaleX({progress:.4})"));
        }
        true
    });
    scope.defer(ResourceKind::FrameCallback, move || frame_loop.stop());

    scope
}

#[derive(Properties, PartialEq)]
struct NavBarProps {
    name: AttrValue,
    active: ActiveSections,
    progress_bar: NodeRef,
}

#[function_component(NavBar)]
fn nav_bar(props: &NavBarProps) -> Html {
    html! {
        <header class="site-header">
            <nav class="site-nav" aria-label="Sections">
                <a class="brand" href="#about">{props.name.clone()}</a>
                <ul class="nav-list">
                    { for NAV_SECTIONS.iter().map(|(id, label)| {
                        let current = props.active.contains(*id);
                        html! {
                            <li>
                                <a
                                    class={classes!("nav-link", current.then_some("is-active"))}
                                    href={format!("#{id}")}
                                    aria-current={current.then_some("true")}
                                >
                                    {*label}
                                </a>
                            </li>
                        }
                    }) }
                </ul>
            </nav>
            <div class="scroll-progress" aria-hidden="true">
                <div ref={props.progress_bar.clone()} class="scroll-progress-bar" />
            </div>
        </header>
    }
}

#[function_component(App)]
fn app() -> Html {
    let motion = use_memo((), |_| MotionContext::new(MotionConfig::from_build_env()));
    let content = use_memo((), |_| Portfolio::embedded().map(Rc::new));
    let active = use_state(ActiveSections::new);
    let progress_bar = use_node_ref();

    {
        let motion = (*motion).clone();
        let active = active.clone();
        let progress_bar = progress_bar.clone();
        use_effect_with((), move |_| {
            let scope = mount_page(&motion, active, progress_bar);

            move || {
                drop(scope);
                if let Some(live) = motion.with(|stage| stage.teardown()) {
                    log_event(
                        &motion.config().log,
                        LogLevel::Debug,
                        "page_teardown",
                        serde_json::json!({ "live_tweens": live }),
                    );
                }
            }
        });
    }

    {
        let motion = (*motion).clone();
        let failed = content.as_ref().as_ref().err().map(ToString::to_string);
        use_effect_with((), move |_| {
            if let Some(error) = failed {
                log_event(
                    &motion.config().log,
                    LogLevel::Info,
                    "content_decode_failed",
                    serde_json::json!({ "error": error }),
                );
            }
            || ()
        });
    }

    let page = match content.as_ref() {
        Ok(portfolio) => html! {
            <>
                <NavBar
                    name={portfolio.bio.name.clone()}
                    active={(*active).clone()}
                    progress_bar={progress_bar.clone()}
                />
                <main id="content">
                    <About bio={portfolio.bio.clone()} />
                    <Skills portfolio={Rc::clone(portfolio)} />
                    <Projects portfolio={Rc::clone(portfolio)} />
                    <ExperienceTimeline portfolio={Rc::clone(portfolio)} />
                    <Contact />
                </main>
                <footer class="site-footer">
                    <p class="muted">{format!("© {}", portfolio.bio.name)}</p>
                </footer>
            </>
        },
        Err(_) => html! {
            <main id="content">
                <p class="load-error" role="alert">{"Portfolio content could not be loaded."}</p>
            </main>
        },
    };

    html! {
        <ContextProvider<MotionContext> context={(*motion).clone()}>
            <a class="skip-link" href="#content">{"Skip to main content"}</a>
            <ParticleCanvas />
            { page }
        </ContextProvider<MotionContext>>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
