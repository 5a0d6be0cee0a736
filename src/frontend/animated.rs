use super::stage::{MotionContext, SharedController};
use motion_portfolio::{
    config::MotionConfig,
    motion::{
        seed_points, ElementKey, IdleProfile, IdleTweenPool, InteractionController, ObservationWindow, PointerEvent,
        RevealStyle,
    },
};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MouseEvent};
use yew::prelude::*;

#[hook]
pub fn use_motion_config() -> MotionConfig {
    use_context::<MotionContext>()
        .map(|motion| motion.config())
        .unwrap_or_default()
}

/// One controller for a whole group of cards, torn down with the group.
#[hook]
pub fn use_shared_controller(build: fn() -> InteractionController) -> SharedController {
    let motion = use_context::<MotionContext>();
    let controller = use_memo((), move |_| SharedController::new(build()));

    {
        let controller = (*controller).clone();
        use_effect_with((), move |_| {
            move || {
                if let Some(motion) = motion {
                    motion.with(|stage| controller.borrow_mut().teardown(&mut stage.timeline));
                }
            }
        });
    }

    (*controller).clone()
}

#[derive(Properties, PartialEq)]
pub struct RevealProps {
    pub section: AttrValue,
    pub entrance: RevealStyle,
    #[prop_or(ObservationWindow::ITEM_REVEAL)]
    pub window: ObservationWindow,
    #[prop_or_default]
    pub delay: f64,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub children: Html,
}

/// Wrapper that starts hidden and plays its entrance once, the first time it
/// scrolls into its observation window.
#[function_component(Reveal)]
pub fn reveal(props: &RevealProps) -> Html {
    let motion = use_context::<MotionContext>();
    let node = use_node_ref();

    {
        let node = node.clone();
        let section = props.section.to_string();
        let (entrance, observation, delay) = (props.entrance, props.window, props.delay);
        use_effect_with((), move |_| {
            let key = motion.as_ref().zip(node.cast::<HtmlElement>()).and_then(|(motion, element)| {
                motion.with(|stage| stage.prepare_reveal(&section, element, entrance, observation, delay))
            });

            move || {
                if let (Some(motion), Some(key)) = (motion, key) {
                    motion.with(|stage| stage.release_reveal(&section, key));
                }
            }
        });
    }

    html! {
        <div ref={node} class={props.class.clone()}>
            { props.children.clone() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TiltCardProps {
    pub controller: SharedController,
    #[prop_or_default]
    pub index: usize,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub children: Html,
}

fn pointer_position(event: &MouseEvent) -> (f64, f64) {
    (f64::from(event.client_x()), f64::from(event.client_y()))
}

#[function_component(TiltCard)]
pub fn tilt_card(props: &TiltCardProps) -> Html {
    let motion = use_context::<MotionContext>();
    let node = use_node_ref();
    let key = use_mut_ref(|| None::<ElementKey>);

    {
        let motion = motion.clone();
        let node = node.clone();
        let key = key.clone();
        let controller = props.controller.clone();
        let index = props.index;
        use_effect_with((), move |_| {
            let bound = motion.as_ref().zip(node.cast::<HtmlElement>()).and_then(|(motion, element)| {
                motion.with(|stage| {
                    let element_key = stage.bind(element, Some(controller.perspective()));
                    controller
                        .borrow_mut()
                        .attach_idle(&mut stage.timeline, Some(element_key), index);
                    stage.route(element_key, controller.clone());
                    element_key
                })
            });
            *key.borrow_mut() = bound;

            move || {
                let Some(element_key) = key.borrow_mut().take() else {
                    return;
                };
                if let Some(motion) = motion {
                    motion.with(|stage| {
                        controller.borrow_mut().forget(&mut stage.timeline, element_key);
                        stage.unbind(element_key);
                    });
                }
            }
        });
    }

    let pointer = |to_event: fn(&MouseEvent) -> PointerEvent| {
        let motion = motion.clone();
        let key = key.clone();
        let controller = props.controller.clone();
        Callback::from(move |event: MouseEvent| {
            let element_key = *key.borrow();
            if let Some(motion) = motion.as_ref() {
                motion.with(|stage| stage.pointer(&controller, element_key, to_event(&event)));
            }
        })
    };

    let onmouseenter = pointer(|event| {
        let (x, y) = pointer_position(event);
        PointerEvent::Enter { x, y }
    });
    let onmousemove = pointer(|event| {
        let (x, y) = pointer_position(event);
        PointerEvent::Move { x, y }
    });
    let onmouseleave = pointer(|_| PointerEvent::Leave);

    html! {
        <div
            ref={node}
            class={props.class.clone()}
            onmouseenter={onmouseenter}
            onmousemove={onmousemove}
            onmouseleave={onmouseleave}
        >
            { props.children.clone() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct IdleOrnamentProps {
    pub profile: IdleProfile,
    #[prop_or_default]
    pub class: Classes,
}

/// Decorative element that loops its idle tween for as long as it is mounted.
#[function_component(IdleOrnament)]
pub fn idle_ornament(props: &IdleOrnamentProps) -> Html {
    let motion = use_context::<MotionContext>();
    let node = use_node_ref();

    {
        let node = node.clone();
        let profile = props.profile;
        use_effect_with((), move |_| {
            let mut pool = IdleTweenPool::new(profile);
            let key = motion.as_ref().zip(node.cast::<HtmlElement>()).and_then(|(motion, element)| {
                motion.with(|stage| {
                    let element_key = stage.bind(element, None);
                    pool.attach(&mut stage.timeline, Some(element_key), 0);
                    element_key
                })
            });

            move || {
                if let (Some(motion), Some(key)) = (motion, key) {
                    motion.with(|stage| {
                        pool.detach_all(&mut stage.timeline);
                        stage.unbind(key);
                    });
                }
            }
        });
    }

    html! { <div ref={node} class={props.class.clone()} aria-hidden="true" /> }
}

#[derive(Properties, PartialEq)]
pub struct SeedParticlesProps {
    pub seed: u32,
    pub count: usize,
}

/// Seeded dots laid out once from the layout generator, each wandering under
/// its own drift tween.
#[function_component(SeedParticles)]
pub fn seed_particles(props: &SeedParticlesProps) -> Html {
    let motion = use_context::<MotionContext>();
    let layer = use_node_ref();
    let points = use_memo((props.seed, props.count), |(seed, count)| seed_points(*seed, *count));

    {
        let layer = layer.clone();
        let seed = props.seed;
        use_effect_with((), move |_| {
            let mut pool = IdleTweenPool::new(IdleProfile::Drift { seed });
            let mut keys = Vec::new();

            if let (Some(motion), Some(layer)) = (motion.as_ref(), layer.cast::<Element>()) {
                let dots = layer.children();
                motion.with(|stage| {
                    for index in 0..dots.length() {
                        let key = dots
                            .item(index)
                            .and_then(|dot| dot.dyn_into::<HtmlElement>().ok())
                            .map(|dot| stage.bind(dot, None));
                        pool.attach(&mut stage.timeline, key, index as usize);
                        keys.extend(key);
                    }
                });
            }

            move || {
                if let Some(motion) = motion {
                    motion.with(|stage| {
                        pool.detach_all(&mut stage.timeline);
                        for key in keys {
                            stage.unbind(key);
                        }
                    });
                }
            }
        });
    }

    html! {
        <div ref={layer} class="seed-particles" aria-hidden="true">
            { for points.iter().map(|point| html! { <span class="seed-particle" style={point.style()} /> }) }
        </div>
    }
}
