use hooklab_core::*;
use hooklab_ui::*;

/// What the child lets its parent do.
pub trait ToggleHandle {
    fn alter_toggle(&self);
}

struct Toggler {
    toggle: bool,
    set_toggle: Setter<bool>,
}

impl ToggleHandle for Toggler {
    fn alter_toggle(&self) {
        self.set_toggle.set(!self.toggle);
    }
}

/// Child: owns the toggle and exposes only `alter_toggle`.
pub fn ToggleButton(handle: &HandleRef<dyn ToggleHandle>) -> Node {
    let (toggle, set_toggle) = use_state(|| false);

    use_imperative_handle(handle, Deps::always(), move || {
        std::rc::Rc::new(Toggler { toggle, set_toggle }) as std::rc::Rc<dyn ToggleHandle>
    });

    Fragment().child((
        Button("Button From Child", || {}),
        when(toggle, || Span("Toggle")),
    ))
}

pub fn ImperativeHandle() -> Node {
    let button_ref = use_handle_ref::<dyn ToggleHandle>();

    Div().child((
        Button("Button From Parent", {
            let button_ref = button_ref.clone();
            move || {
                if let Err(e) = button_ref.with(|b| b.alter_toggle()) {
                    log::warn!("child handle unavailable: {e}");
                }
            }
        }),
        component("button", "Button", move || ToggleButton(&button_ref)),
    ))
}
