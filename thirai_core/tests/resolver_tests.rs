use thirai_core::resolver::SmartResolver;

#[test]
fn test_video_url_variants() {
    let resolver = SmartResolver::new();

    // Mobile URL
    let action = resolver
        .resolve("https://m.youtube.com/watch?v=dQw4w9WgXcQ")
        .unwrap();
    assert_eq!(action.connector, "videos");
    assert_eq!(action.tool, "get_video");
    assert_eq!(action.arguments.get("videoId").unwrap(), "dQw4w9WgXcQ");

    // No scheme, no www
    let action = resolver.resolve("youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
    assert_eq!(action.connector, "videos");

    // Embed URL
    let action = resolver
        .resolve("https://www.youtube.com/embed/dQw4w9WgXcQ")
        .unwrap();
    assert_eq!(action.connector, "videos");
    assert_eq!(action.arguments.get("videoId").unwrap(), "dQw4w9WgXcQ");

    // Trailing query parameters after the id
    let action = resolver
        .resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s")
        .unwrap();
    assert_eq!(action.arguments.get("videoId").unwrap(), "dQw4w9WgXcQ");
}

#[test]
fn test_playlist_id_variants() {
    let resolver = SmartResolver::new();

    // Uploads playlist (UU prefix)
    let action = resolver.resolve("UU_x5XG1OV2P6uZZ5FSM9Ttw").unwrap();
    assert_eq!(action.connector, "playlists");
    assert_eq!(action.tool, "get_playlist");
    assert_eq!(
        action.arguments.get("playlistId").unwrap(),
        "UU_x5XG1OV2P6uZZ5FSM9Ttw"
    );

    // Liked-videos playlist (LL prefix)
    let action = resolver.resolve("LL_x5XG1OV2P6uZZ5FSM9Ttw").unwrap();
    assert_eq!(action.connector, "playlists");

    // Playlist URL with a tracking suffix
    let action = resolver
        .resolve("https://www.youtube.com/playlist?list=PLBCF2DAC6FFB574DE&si=abc123")
        .unwrap();
    assert_eq!(action.connector, "playlists");
    assert_eq!(
        action.arguments.get("playlistId").unwrap(),
        "PLBCF2DAC6FFB574DE"
    );
}

#[test]
fn test_handle_variants() {
    let resolver = SmartResolver::new();

    // Handle with a dot
    let action = resolver.resolve("@3blue1brown.math").unwrap();
    assert_eq!(action.connector, "channels");
    assert_eq!(action.tool, "get_channel");
    assert_eq!(
        action.arguments.get("channelId").unwrap(),
        "@3blue1brown.math"
    );

    // Handle URL without a scheme
    let action = resolver.resolve("youtube.com/@veritasium").unwrap();
    assert_eq!(action.connector, "channels");
    assert_eq!(action.arguments.get("channelId").unwrap(), "@veritasium");
}

#[test]
fn test_resolve_all_on_mixed_text() {
    let resolver = SmartResolver::new();

    // Text carrying both a video and a playlist link matches both
    // patterns; the video match comes first
    let matches = resolver.resolve_all(
        "see https://youtu.be/dQw4w9WgXcQ and \
         https://www.youtube.com/playlist?list=PLBCF2DAC6FFB574DE",
    );
    assert!(matches.len() >= 2);
    assert_eq!(matches[0].connector, "videos");
    assert!(matches.iter().any(|m| m.connector == "playlists"));
}
