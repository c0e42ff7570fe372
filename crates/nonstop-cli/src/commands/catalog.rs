use crate::app::App;
use anyhow::Result;

pub async fn search(app: &App, query: &str) -> Result<()> {
    let tracks = app.catalog.search_tracks(query).await;
    if tracks.is_empty() {
        println!("No tracks found");
        return Ok(());
    }
    for track in tracks {
        println!("{}  {} - {}", track.id, track.name, track.artist_names());
    }
    Ok(())
}

pub async fn track(app: &App, track_id: &str) -> Result<()> {
    match app.catalog.preview_url(track_id).await? {
        Some(url) => println!("{}", url),
        None => println!("No preview available for this track"),
    }
    Ok(())
}
