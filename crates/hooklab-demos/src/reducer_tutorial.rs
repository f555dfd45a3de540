use hooklab_core::*;
use hooklab_ui::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterState {
    pub count: i64,
    pub show_text: bool,
}

impl Default for CounterState {
    fn default() -> Self {
        Self {
            count: 0,
            show_text: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterAction {
    Increment,
    ToggleShowText,
    /// Not handled; the state stays as it is.
    Unknown,
}

pub fn reducer(state: &CounterState, action: &CounterAction) -> Option<CounterState> {
    match action {
        CounterAction::Increment => Some(CounterState {
            count: state.count + 1,
            show_text: state.show_text,
        }),
        CounterAction::ToggleShowText => Some(CounterState {
            count: state.count,
            show_text: !state.show_text,
        }),
        CounterAction::Unknown => None,
    }
}

/// One click dispatches two actions; both fold into a single re-render.
pub fn ReducerTutorial() -> Node {
    let (state, dispatch) = use_reducer(reducer, CounterState::default);

    Div().child((
        Heading(state.count.to_string()),
        Button("Click Here", move || {
            dispatch.send(CounterAction::Increment);
            dispatch.send(CounterAction::ToggleShowText);
        }),
        when(state.show_text, || Paragraph("This is a text")),
    ))
}
