use editorialcalendar::editorial_calendar;
use editorialcalendar::editorial_calendar::model::CalendarKind;
use editorialcalendar::tracing::setup_loki;
use strum::IntoEnumIterator;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let loki = setup_loki().await;

    if let Err(err) = editorial_calendar::start().await {
        error!("Editorial calendar startup task failed: {}", err);
    }

    let snapshot = editorial_calendar::snapshot();

    CalendarKind::iter().for_each(|kind| {
        info!("Loaded {} {} entries", snapshot.count(kind), kind)
    });

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed listening for shutdown signal: {}", err);
    }

    editorial_calendar::global().stop();

    if let Some((controller, handle)) = loki {
        controller.shutdown().await;

        if let Err(err) = handle.await {
            error!("Loki background task failed: {}", err);
        }
    }
}
