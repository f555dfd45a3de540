use hooklab_core::*;
use hooklab_ui::*;

/// Echoes whatever is typed. The input is uncontrolled; only the echo
/// reads the state.
pub fn StateTutorial() -> Node {
    let (input_value, set_input_value) = use_state(|| "Pedro".to_string());

    Div().child((
        Input()
            .placeholder("enter something...")
            .on_change(move |v| set_input_value.set(v)),
        Text(input_value),
    ))
}
