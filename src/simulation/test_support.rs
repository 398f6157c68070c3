use crate::prognostics::{
    EventStates, GeneratedModel, Input, ModelKeys, Output, State,
};

/// A linear decay `a' = -rate` with two events.
///
/// - `halfway`: met once `a` drops below 5
/// - `depleted`: met once `a` drops below 0
///
/// The initial state is taken from the first output.
pub(super) fn decay_model() -> GeneratedModel {
    let keys = ModelKeys::new(&["rate"], &["a"], &["a"], &["halfway", "depleted"]).unwrap();

    GeneratedModel::builder(keys)
        .initialize(|_u, z| Ok(State::from([("a", z.get("a")?)])))
        .next_state(|_t, x, u, dt| Ok(State::from([("a", x.get("a")? - u.get("rate")? * dt)])))
        .output(|_t, x| Ok(Output::from([("a", x.get("a")?)])))
        .event_state(|_t, x| {
            let a = x.get("a")?;
            Ok(EventStates::from([
                ("halfway", (a - 5.0) / 5.0),
                ("depleted", a / 10.0),
            ]))
        })
        .build()
        .unwrap()
}

pub(super) fn first_output(a: f64) -> Output {
    Output::from([("a", a)])
}

pub(super) fn rate(rate: f64) -> impl Fn(f64) -> Input {
    move |_t| Input::from([("rate", rate)])
}
