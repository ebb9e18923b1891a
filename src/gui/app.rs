use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::ring::{self, FOCAL_RADIUS, RingState};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window::{self, MotionWatch};
use crate::sys::media::MediaBridge;
use gtk::prelude::*;
use gtk4 as gtk;
use orrery_core::{EngineEvent, Input, Point};
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

const FOCAL_SIZE: i32 = (FOCAL_RADIUS * 2.0) as i32;

/// Everything that lives exactly as long as one mounted ring.
struct Session {
    tick: gtk::TickCallbackId,
    media: Option<MediaBridge>,
    motion: Option<MotionWatch>,
}

pub struct AppModel {
    pub config: Config,
    pub ring: Rc<RefCell<Option<RingState>>>,
    pub visible: bool,
    pub drawing_area: gtk::DrawingArea,
    pub picture: gtk::Picture,
    session: Option<Session>,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Engine(EngineEvent),
    Click(Point),
    Resize(f64, f64),
    Mapped(bool),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Cycle(d) => AppMsg::Engine(EngineEvent::Input(Input::Cycle(d))),
            AppEvent::Select(i) => AppMsg::Engine(EngineEvent::Input(Input::Select(i))),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Orrery"),
            #[watch]
            set_visible: model.visible,
            add_css_class: "orrery-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Hide);
                        return glib::Propagation::Stop;
                    }
                    match ring::key_for(key) {
                        Some(k) => {
                            sender.input(AppMsg::Engine(EngineEvent::Input(Input::Key(k))));
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "picture"]
                gtk::Picture {
                    set_can_shrink: true,
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::Center,
                    set_size_request: (FOCAL_SIZE, FOCAL_SIZE),
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::init_window(&root);

        let drawing_area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        drawing_area.add_css_class("orrery-ring");

        let model = AppModel {
            config,
            ring: Rc::new(RefCell::new(None)),
            visible: true,
            drawing_area,
            picture: gtk::Picture::default(),
            session: None,
        };

        let widgets = view_output!();

        let mut model = model;
        model.picture = widgets.picture.clone();
        // the ring sits on top of the focal media
        widgets.overlay.add_overlay(&model.drawing_area);
        connect_pointer(&model.drawing_area, &sender);

        let ring_draw = model.ring.clone();
        model
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let ring = ring_draw.borrow();
                if let Some(ring) = ring.as_ref() {
                    let colors = ThemeColors::from_context(&drawing_area.style_context());
                    if let Err(e) = ring::draw(cr, ring, &colors) {
                        log::error!("Drawing error: {}", e);
                    }
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        model.mount(&sender);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => self.visible = true,
            AppMsg::Hide => self.visible = false,
            AppMsg::Engine(event) => self.with_ring(|ring| ring.dispatch(event)),
            AppMsg::Click(point) => self.with_ring(|ring| {
                if let Some(index) = ring.hit_test(point) {
                    ring.dispatch(EngineEvent::Input(Input::Select(index)));
                }
            }),
            AppMsg::Resize(width, height) => self.with_ring(|ring| ring.resize(width, height)),
            AppMsg::Mapped(true) => self.with_ring(RingState::resume),
            AppMsg::Mapped(false) => self.with_ring(RingState::pause),
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.unmount();
                    self.config = new_config;
                    self.mount(&sender);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.unmount();
    }
}

impl AppModel {
    /// Builds a fresh engine for the current config and starts feeding it frames,
    /// media timing and the desktop's motion preference.
    fn mount(&mut self, sender: &ComponentSender<Self>) {
        let (width, height) = (
            self.drawing_area.width() as f64,
            self.drawing_area.height() as f64,
        );
        let reduced_motion = self
            .config
            .reduced_motion
            .unwrap_or_else(window::prefers_reduced_motion);

        match RingState::new(&self.config, width, height, reduced_motion) {
            Ok(state) => *self.ring.borrow_mut() = Some(state),
            Err(e) => {
                log::error!("Cannot mount the ring: {}", e);
                return;
            }
        }

        let ring = self.ring.clone();
        let tick = self.drawing_area.add_tick_callback(move |area, clock| {
            if let Some(state) = ring.borrow_mut().as_mut() {
                state.tick(clock.frame_time());
            }
            area.queue_draw();
            glib::ControlFlow::Continue
        });

        let media = self.config.media.as_deref().map(|path| {
            let sender = sender.clone();
            MediaBridge::open(path, move |signal| {
                sender.input(AppMsg::Engine(EngineEvent::Media(signal)))
            })
        });
        self.picture
            .set_paintable(media.as_ref().map(MediaBridge::stream));

        // an explicit config setting wins over the desktop
        let motion = if self.config.reduced_motion.is_none() {
            let sender = sender.clone();
            MotionWatch::new(move |reduced| {
                sender.input(AppMsg::Engine(EngineEvent::ReducedMotion(reduced)))
            })
        } else {
            None
        };

        self.session = Some(Session {
            tick,
            media,
            motion,
        });
    }

    fn unmount(&mut self) {
        if let Some(session) = self.session.take() {
            session.tick.remove();
            if let Some(media) = session.media {
                media.close();
            }
            if let Some(motion) = session.motion {
                motion.close();
            }
        }
        self.picture.set_paintable(None::<&gtk::gdk::Paintable>);

        if let Some(mut state) = self.ring.borrow_mut().take() {
            state.engine.teardown();
        }
    }

    fn with_ring(&self, f: impl FnOnce(&mut RingState)) {
        if let Some(state) = self.ring.borrow_mut().as_mut() {
            f(state);
        }
        self.drawing_area.queue_draw();
    }
}

fn connect_pointer(area: &gtk::DrawingArea, sender: &ComponentSender<AppModel>) {
    let click = gtk::GestureClick::new();
    click.set_button(1); // primary only
    let s = sender.clone();
    click.connect_released(move |_, _, x, y| {
        s.input(AppMsg::Click(Point::new(x, y)));
    });
    area.add_controller(click);

    let s = sender.clone();
    area.connect_resize(move |_, width, height| {
        s.input(AppMsg::Resize(width as f64, height as f64));
    });

    let s = sender.clone();
    area.connect_map(move |_| s.input(AppMsg::Mapped(true)));
    let s = sender.clone();
    area.connect_unmap(move |_| s.input(AppMsg::Mapped(false)));
}
