use hooklab_core::*;
use hooklab_ui::*;

use crate::console::Console;

/// Reads the input before the first paint, then overwrites it after paint.
/// The first frame shows `PEDRO`, the repaint shows `HELLO`.
pub fn LayoutEffectTutorial(console: &Console) -> Node {
    let input_ref = use_node_ref();

    use_layout_effect(Deps::once(), {
        let input_ref = input_ref.clone();
        let console = console.clone();
        move || {
            match input_ref.value() {
                Ok(v) => console.log(v),
                Err(e) => log::warn!("layout read failed: {e}"),
            }
            Dispose::none()
        }
    });

    use_effect(Deps::once(), {
        let input_ref = input_ref.clone();
        move || {
            if let Err(e) = input_ref.set_value("HELLO") {
                log::warn!("post-paint write failed: {e}");
            }
            Dispose::none()
        }
    });

    Div().child(Input().value("PEDRO").node_ref(&input_ref))
}
