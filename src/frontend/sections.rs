use super::animated::{use_motion_config, use_shared_controller, IdleOrnament, Reveal, SeedParticles, TiltCard};
use gloo_timers::future::TimeoutFuture;
use motion_portfolio::{
    config::CONTACT_SUBMIT_DELAY_MS,
    contact::{ContactError, ContactFields, ContactForm, FormState},
    content::{Bio, Portfolio, Skill, SkillTab},
    logging::{log_event, LogConfig, LogLevel},
    motion::{CancelToken, IdleProfile, IdleTweenPool, InteractionController, ObservationWindow, RevealStyle, TiltProfile},
};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

const PORTRAIT_PATH: &str = "/profilePic.jpg";
const SKILL_STAGGER: f64 = 0.05;
const PROJECT_STAGGER: f64 = 0.08;
const EXPERIENCE_STAGGER: f64 = 0.06;

#[derive(Properties, PartialEq)]
pub struct AboutProps {
    pub bio: Bio,
}

#[function_component(About)]
pub fn about(props: &AboutProps) -> Html {
    let config = use_motion_config();
    let portrait = use_shared_controller(|| InteractionController::new(TiltProfile::Wide));
    let bio = &props.bio;

    html! {
        <section id="about" class="section about" aria-labelledby="about-heading">
            <SeedParticles seed={config.layout_seed} count={config.seed_point_count} />
            <div class="about-grid">
                <Reveal
                    section="about/portrait"
                    entrance={RevealStyle::FROM_LEFT}
                    window={ObservationWindow::SECTION_REVEAL}
                    class="portrait-column"
                >
                    <div class="portrait-frame">
                        <IdleOrnament profile={IdleProfile::Halo} class="portrait-halo" />
                        <TiltCard controller={portrait} class="portrait-card">
                            <img
                                src={config.assets.resolve(PORTRAIT_PATH)}
                                alt={format!("Portrait of {}", bio.name)}
                            />
                        </TiltCard>
                    </div>
                </Reveal>
                <Reveal
                    section="about/intro"
                    entrance={RevealStyle::FROM_RIGHT}
                    window={ObservationWindow::SECTION_REVEAL}
                    delay={0.1}
                >
                    <p class="eyebrow">{"Hello, I'm"}</p>
                    <h1 id="about-heading">{bio.name.clone()}</h1>
                    <p class="role">{bio.title.clone()}</p>
                    <p class="tagline">{bio.tagline.clone()}</p>
                    <p class="muted">{format!("{}+ years shipping for the web", bio.years)}</p>
                </Reveal>
                <Reveal section="about/tech" entrance={RevealStyle::FADE} delay={0.2}>
                    <ul class="tech-list">
                        { for bio.tech.iter().map(|tech| html! { <li class="tech-pill">{tech.clone()}</li> }) }
                    </ul>
                </Reveal>
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct SectionHeadingProps {
    section: AttrValue,
    title: AttrValue,
}

/// Section title with an underline that draws in once the section is reached.
#[function_component(SectionHeading)]
fn section_heading(props: &SectionHeadingProps) -> Html {
    html! {
        <Reveal
            section={props.section.clone()}
            entrance={RevealStyle::RISE}
            window={ObservationWindow::SECTION_REVEAL}
            class="section-heading"
        >
            <h2 id={format!("{}-heading", props.section)}>{props.title.clone()}</h2>
            <Reveal
                section={format!("{}/underline", props.section)}
                entrance={RevealStyle::UNDERLINE}
                window={ObservationWindow::SECTION_REVEAL}
                class="heading-underline"
            />
        </Reveal>
    }
}

#[derive(Properties, PartialEq)]
pub struct ContentProps {
    pub portfolio: Rc<Portfolio>,
}

fn skill_card(skill: &Skill) -> Html {
    html! {
        <>
            if let Some(icon) = skill.icon.as_deref() {
                <span class={classes!("skill-icon", format!("skill-icon-{icon}"))} aria-hidden="true">
                    {skill.name.chars().next().map(String::from).unwrap_or_default()}
                </span>
            }
            <h3>{skill.name.clone()}</h3>
            if let Some(level) = skill.level {
                <p class="skill-level">{level.label()}</p>
            }
            if let Some(description) = skill.description.as_deref() {
                <p class="muted">{description.to_string()}</p>
            }
        </>
    }
}

#[function_component(Skills)]
pub fn skills(props: &ContentProps) -> Html {
    let tab = use_state(SkillTab::default);
    let controller = use_shared_controller(|| {
        InteractionController::new(TiltProfile::Lift).with_idle_pool(IdleTweenPool::new(IdleProfile::FloatCard))
    });

    let visible = props.portfolio.skills_for(*tab);

    html! {
        <section id="skills" class="section" aria-labelledby="skills-heading">
            <SectionHeading section="skills" title="Skills" />
            <div class="skill-tabs" role="tablist">
                { for SkillTab::ALL.iter().map(|option| {
                    let selected = *option == *tab;
                    let onclick = {
                        let tab = tab.clone();
                        let option = *option;
                        Callback::from(move |_| tab.set(option))
                    };
                    html! {
                        <button
                            type="button"
                            role="tab"
                            class={classes!("skill-tab", selected.then_some("is-active"))}
                            aria-selected={selected.to_string()}
                            onclick={onclick}
                        >
                            {option.label()}
                        </button>
                    }
                }) }
            </div>
            <div class="skill-grid" role="tabpanel">
                { for visible.iter().enumerate().map(|(index, skill)| html! {
                    <Reveal
                        key={format!("{}-{}", tab.label(), skill.name)}
                        section={format!("skills/{}", skill.name)}
                        entrance={RevealStyle::RISE}
                        delay={index as f64 * SKILL_STAGGER}
                    >
                        <TiltCard controller={controller.clone()} index={index} class="skill-card">
                            { skill_card(skill) }
                        </TiltCard>
                    </Reveal>
                }) }
            </div>
        </section>
    }
}

fn external_link(href: &str, label: &'static str) -> Html {
    html! {
        <a class="link" href={href.to_string()} target="_blank" rel="noopener noreferrer">
            {label}
            <span class="external-mark" aria-hidden="true">{"↗"}</span>
            <span class="sr-only">{" (opens in a new tab)"}</span>
        </a>
    }
}

#[function_component(Projects)]
pub fn projects(props: &ContentProps) -> Html {
    let config = use_motion_config();
    let controller = use_shared_controller(|| InteractionController::new(TiltProfile::Card));

    html! {
        <section id="projects" class="section" aria-labelledby="projects-heading">
            <SectionHeading section="projects" title="Projects" />
            <div class="project-grid">
                { for props.portfolio.projects.iter().enumerate().map(|(index, project)| html! {
                    <Reveal
                        key={project.title.clone()}
                        section={format!("projects/{}", project.title)}
                        entrance={RevealStyle::RISE}
                        delay={index as f64 * PROJECT_STAGGER}
                    >
                        <TiltCard controller={controller.clone()} index={index} class="project-card">
                            if let Some(image) = project.image.as_deref() {
                                <img
                                    class="project-image"
                                    src={config.assets.resolve(image)}
                                    alt={project.title.clone()}
                                    loading="lazy"
                                />
                            }
                            <h3>{project.title.clone()}</h3>
                            <p>{project.description.clone()}</p>
                            <ul class="tag-list">
                                { for project.tags.iter().map(|tag| html! { <li class="tag">{tag.clone()}</li> }) }
                            </ul>
                            if project.has_links() {
                                <div class="project-links">
                                    if let Some(github) = project.github.as_deref() {
                                        { external_link(github, "Code") }
                                    }
                                    if let Some(demo) = project.demo.as_deref() {
                                        { external_link(demo, "Live demo") }
                                    }
                                </div>
                            }
                        </TiltCard>
                    </Reveal>
                }) }
            </div>
        </section>
    }
}

#[function_component(ExperienceTimeline)]
pub fn experience_timeline(props: &ContentProps) -> Html {
    html! {
        <section id="experience" class="section" aria-labelledby="experience-heading">
            <SectionHeading section="experience" title="Experience" />
            <ol class="experience-list">
                { for props.portfolio.experience.iter().enumerate().map(|(index, entry)| html! {
                    <li key={format!("{}-{}", entry.company, entry.period)}>
                        <Reveal
                            section={format!("experience/{}/{}", entry.company, entry.period)}
                            entrance={RevealStyle::RISE_SHORT}
                            delay={index as f64 * EXPERIENCE_STAGGER}
                            class="experience-entry"
                        >
                            <div class="experience-meta">
                                <h3>{entry.role.clone()}</h3>
                                <p class="muted">{format!("{} · {}", entry.company, entry.period)}</p>
                            </div>
                            <ul class="row-list">
                                { for entry.bullets.iter().map(|bullet| html! { <li>{bullet.clone()}</li> }) }
                            </ul>
                        </Reveal>
                    </li>
                }) }
            </ol>
        </section>
    }
}

/// Stand-in delivery: nothing leaves the page, the form just waits and
/// reports success.
async fn submit_contact(_fields: &ContactFields) -> bool {
    TimeoutFuture::new(CONTACT_SUBMIT_DELAY_MS).await;
    true
}

fn log_form_state(log: &LogConfig, state: FormState) {
    log_event(
        log,
        LogLevel::Info,
        "contact_state",
        serde_json::json!({ "state": state.as_str() }),
    );
}

#[function_component(Contact)]
pub fn contact() -> Html {
    let config = use_motion_config();
    let name = use_state(String::new);
    let email = use_state(String::new);
    let message = use_state(String::new);
    let form = use_mut_ref(ContactForm::new);
    let state = use_state(FormState::default);
    let error = use_state(|| None::<ContactError>);
    let alive = use_memo((), |_| CancelToken::new());

    {
        let alive = (*alive).clone();
        use_effect_with((), move |_| move || alive.cancel());
    }

    let on_name = {
        let name = name.clone();
        Callback::from(move |event: InputEvent| name.set(event.target_unchecked_into::<HtmlInputElement>().value()))
    };
    let on_email = {
        let email = email.clone();
        Callback::from(move |event: InputEvent| email.set(event.target_unchecked_into::<HtmlInputElement>().value()))
    };
    let on_message = {
        let message = message.clone();
        Callback::from(move |event: InputEvent| {
            message.set(event.target_unchecked_into::<HtmlTextAreaElement>().value())
        })
    };

    let onsubmit = {
        let (name, email, message) = (name.clone(), email.clone(), message.clone());
        let (form, state, error) = (form.clone(), state.clone(), error.clone());
        let alive = (*alive).clone();
        let log = config.log;
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let fields = ContactFields {
                name: (*name).clone(),
                email: (*email).clone(),
                message: (*message).clone(),
            };

            if let Err(reason) = form.borrow_mut().begin_submit(&fields) {
                error.set(Some(reason));
                return;
            }
            error.set(None);
            state.set(FormState::Submitting);
            log_form_state(&log, FormState::Submitting);

            let (form, state, error, alive) = (form.clone(), state.clone(), error.clone(), alive.clone());
            spawn_local(async move {
                let delivered = submit_contact(&fields).await;
                if alive.is_cancelled() {
                    return;
                }

                let outcome = form.borrow_mut().complete(delivered);
                let next = form.borrow().state();
                if let Err(reason) = outcome {
                    error.set(Some(reason));
                }
                state.set(next);
                log_form_state(&log, next);
            });
        })
    };

    let submitting = *state == FormState::Submitting;

    html! {
        <section id="contact" class="section" aria-labelledby="contact-heading">
            <SectionHeading section="contact" title="Contact" />
            <Reveal section="contact/form" entrance={RevealStyle::FADE}>
                if *state == FormState::Sent {
                    <p class="contact-sent" role="status">{"Thanks! Your message is on its way."}</p>
                } else {
                    <form class="contact-form" onsubmit={onsubmit}>
                        <label>
                            <span>{"Name"}</span>
                            <input type="text" value={(*name).clone()} oninput={on_name} disabled={submitting} />
                        </label>
                        <label>
                            <span>{"Email"}</span>
                            <input type="email" value={(*email).clone()} oninput={on_email} disabled={submitting} />
                        </label>
                        <label>
                            <span>{"Message"}</span>
                            <textarea rows="5" value={(*message).clone()} oninput={on_message} disabled={submitting} />
                        </label>
                        if let Some(reason) = *error {
                            <p class="form-error" role="alert">{reason.to_string()}</p>
                        }
                        <button type="submit" class="button" disabled={submitting}>
                            { if submitting { "Sending…" } else { "Send message" } }
                        </button>
                    </form>
                }
            </Reveal>
        </section>
    }
}
