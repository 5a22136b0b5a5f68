use chrono::{DateTime, Utc};

use crate::models::domain::exam::ShowResults;

/// Whether the answer key and detailed breakdown may be shown to the
/// student. Pure and total: it never errors.
///
/// `Imediato` reveals as soon as the attempt is finalized (the caller only
/// asks for finalized attempts). `PorData` reveals from the release date
/// onward, regardless of attempt status. A missing release date under
/// `PorData` is an authoring-time configuration error; here it
/// conservatively never reveals.
pub fn may_reveal(
    mostrar_resultado: ShowResults,
    data_resultado: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    match mostrar_resultado {
        ShowResults::Imediato => true,
        ShowResults::PorData => data_resultado.is_some_and(|date| now >= date),
    }
}
