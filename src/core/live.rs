use crate::models::StreamPlatform;

/// Base URLs used to build placeholder live session links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveLinks {
    pub youtube_base_url: String,
    pub webrtc_base_url: String,
}

impl Default for LiveLinks {
    fn default() -> Self {
        Self {
            youtube_base_url: "https://youtube.com/live".to_string(),
            webrtc_base_url: "https://webrtc.example/room".to_string(),
        }
    }
}

/// Build the link a live session is reachable at
///
/// The link is `{base}/{class_id}-{tutor_id}`, where the base depends on the
/// streaming platform. No stream or room is actually provisioned.
pub fn live_url(
    platform: StreamPlatform,
    links: &LiveLinks,
    class_id: &str,
    tutor_id: &str,
) -> String {
    let base = match platform {
        StreamPlatform::Yt => &links.youtube_base_url,
        StreamPlatform::Webrtc => &links.webrtc_base_url,
    };

    format!("{}/{}-{}", base.trim_end_matches('/'), class_id, tutor_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_link() {
        let url = live_url(StreamPlatform::Yt, &LiveLinks::default(), "c1", "t1");
        assert_eq!(url, "https://youtube.com/live/c1-t1");
    }

    #[test]
    fn test_webrtc_link() {
        let url = live_url(StreamPlatform::Webrtc, &LiveLinks::default(), "c1", "t1");
        assert_eq!(url, "https://webrtc.example/room/c1-t1");
    }

    #[test]
    fn test_trailing_slash_ignored() {
        let links = LiveLinks {
            youtube_base_url: "https://live.example/".to_string(),
            webrtc_base_url: "https://rtc.example//".to_string(),
        };

        assert_eq!(live_url(StreamPlatform::Yt, &links, "a", "b"), "https://live.example/a-b");
        assert_eq!(live_url(StreamPlatform::Webrtc, &links, "a", "b"), "https://rtc.example/a-b");
    }
}
