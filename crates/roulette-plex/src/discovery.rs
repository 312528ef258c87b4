use crate::error::PlexError;
use crate::{build_client, IDENTITY_TIMEOUT, PLEX_TV_BASE_URL, SECTIONS_TIMEOUT};
use quick_xml::events::Event;
use quick_xml::Reader;
use roulette_models::{Credential, LibraryKind, LibrarySection, ServerDescriptor};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Query the account's resource listing and return one descriptor per
/// device advertising server capability.
///
/// For each server exactly one connection URI is selected, preferring a
/// locally-reachable URI over a remote one; a device offering no usable URI
/// is logged and dropped. Zero servers is a valid result, not an error.
pub async fn discover_servers(credential: &Credential) -> Result<Vec<ServerDescriptor>, PlexError> {
    let client = build_client().map_err(|e| PlexError::AuthServiceUnavailable(e.to_string()))?;
    let url = format!("{}/api/resources?includeHttps=1", PLEX_TV_BASE_URL);

    let response = client
        .get(&url)
        .header("X-Plex-Token", credential.as_str())
        .header("Accept", "application/xml")
        .timeout(IDENTITY_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(PlexError::UnexpectedStatus { status, url });
    }

    let body = response.text().await?;
    let servers = parse_device_xml(&body)?;
    info!("Discovered {} Plex servers", servers.len());
    Ok(servers)
}

/// Fetch the library listing from a server's admin endpoint.
///
/// Timeouts and HTTP failures propagate as errors here; callers treat them
/// as "no libraries yet" and keep going rather than aborting the flow.
pub async fn list_library_sections(
    server: &ServerDescriptor,
) -> Result<Vec<LibrarySection>, PlexError> {
    let client = build_client().map_err(|e| PlexError::AuthServiceUnavailable(e.to_string()))?;
    let url = format!("{}/library/sections", server.base_uri);

    let response = client
        .get(&url)
        .query(&[("X-Plex-Token", server.access_token.as_str())])
        .timeout(SECTIONS_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(PlexError::UnexpectedStatus { status, url });
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| PlexError::Parse(e.to_string()))?;

    let sections = parse_sections_json(&body);
    debug!("Server {} lists {} library sections", server.name, sections.len());
    Ok(sections)
}

/// Resolve the server's machine identifier from its root endpoint.
///
/// Older servers answer with XML, newer ones with JSON; both are accepted.
/// Any failure degrades to "unknown" so deep links still render.
pub async fn machine_identifier(server: &ServerDescriptor) -> String {
    let client = match build_client() {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build client for machine identifier: {}", e);
            return "unknown".to_string();
        }
    };

    let url = format!(
        "{}/?X-Plex-Token={}",
        server.base_uri, server.access_token
    );

    let response = match client.get(&url).timeout(SECTIONS_TIMEOUT).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to query machine identifier: {}", e);
            return "unknown".to_string();
        }
    };

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to read machine identifier response: {}", e);
            return "unknown".to_string();
        }
    };

    match parse_machine_identifier(&content_type, &body) {
        Some(id) => id,
        None => {
            warn!(
                "Unexpected machine identifier response (content type {})",
                content_type
            );
            "unknown".to_string()
        }
    }
}

/// Parse the XML device list returned by the resources endpoint.
pub fn parse_device_xml(xml: &str) -> Result<Vec<ServerDescriptor>, PlexError> {
    #[derive(Default)]
    struct DeviceAttrs {
        name: String,
        access_token: String,
        provides: String,
        local_uri: Option<String>,
        remote_uri: Option<String>,
    }

    fn attr_value(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
        e.attributes()
            .flatten()
            .find(|a| a.key.as_ref() == key)
            .map(|a| String::from_utf8_lossy(&a.value).into_owned())
    }

    fn finish(device: DeviceAttrs, servers: &mut Vec<ServerDescriptor>) {
        if !device.provides.contains("server") {
            return;
        }
        // Local connections win over remote; within a class the first listed wins
        match device.local_uri.or(device.remote_uri) {
            Some(uri) => {
                debug!("Selected connection for {}: {}", device.name, uri);
                servers.push(ServerDescriptor {
                    name: device.name,
                    base_uri: uri,
                    access_token: device.access_token,
                });
            }
            None => {
                debug!("Dropping server {} with no usable connection URI", device.name);
            }
        }
    }

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut servers = Vec::new();
    let mut current: Option<DeviceAttrs> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"Device" => {
                    // A self-closing Device never sees an End event, so a
                    // new Device start closes out the previous one
                    if let Some(device) = current.take() {
                        finish(device, &mut servers);
                    }
                    current = Some(DeviceAttrs {
                        name: attr_value(&e, b"name").unwrap_or_default(),
                        access_token: attr_value(&e, b"accessToken").unwrap_or_default(),
                        provides: attr_value(&e, b"provides").unwrap_or_default(),
                        local_uri: None,
                        remote_uri: None,
                    });
                }
                b"Connection" => {
                    if let Some(device) = current.as_mut() {
                        let uri = attr_value(&e, b"uri").filter(|u| !u.is_empty());
                        let local = attr_value(&e, b"local").as_deref() == Some("1");
                        if let Some(uri) = uri {
                            if local && device.local_uri.is_none() {
                                device.local_uri = Some(uri);
                            } else if !local && device.remote_uri.is_none() {
                                device.remote_uri = Some(uri);
                            }
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"Device" {
                    if let Some(device) = current.take() {
                        finish(device, &mut servers);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(PlexError::Parse(format!("device list XML: {}", e))),
        }
    }

    if let Some(device) = current.take() {
        finish(device, &mut servers);
    }

    Ok(servers)
}

/// Parse the `MediaContainer.Directory` section listing.
pub fn parse_sections_json(body: &Value) -> Vec<LibrarySection> {
    let directories = body
        .get("MediaContainer")
        .and_then(|mc| mc.get("Directory"))
        .and_then(|d| d.as_array());

    let mut sections = Vec::new();
    if let Some(directories) = directories {
        for dir in directories {
            let key = dir.get("key").and_then(|k| k.as_str()).unwrap_or("");
            let title = dir.get("title").and_then(|t| t.as_str()).unwrap_or("");
            let type_ = dir.get("type").and_then(|t| t.as_str()).unwrap_or("");
            if key.is_empty() || title.is_empty() {
                continue;
            }
            sections.push(LibrarySection {
                key: key.to_string(),
                title: title.to_string(),
                kind: LibraryKind::from_plex_type(type_),
            });
        }
    }
    sections
}

/// Extract the machine identifier from either response form.
pub fn parse_machine_identifier(content_type: &str, body: &str) -> Option<String> {
    if content_type.contains("xml") {
        return parse_machine_identifier_xml(body);
    }
    if content_type.starts_with("application/json") {
        let json: Value = serde_json::from_str(body).ok()?;
        return json
            .get("MediaContainer")
            .and_then(|mc| mc.get("machineIdentifier"))
            .and_then(|id| id.as_str())
            .map(|id| id.to_string());
    }
    None
}

fn parse_machine_identifier_xml(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref() == b"machineIdentifier")
                    .map(|a| String::from_utf8_lossy(&a.value).into_owned());
            }
            Ok(Event::Eof) => return None,
            Ok(_) => {}
            Err(_) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_device_xml_prefers_local_connection() {
        let xml = r#"<MediaContainer>
            <Device name="Den" provides="server" accessToken="tok1">
                <Connection local="0" uri="https://1-2-3-4.example.plex.direct:32400"/>
                <Connection local="1" uri="http://192.168.1.10:32400"/>
            </Device>
        </MediaContainer>"#;

        let servers = parse_device_xml(xml).unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "Den");
        assert_eq!(servers[0].base_uri, "http://192.168.1.10:32400");
        assert_eq!(servers[0].access_token, "tok1");
    }

    #[test]
    fn test_parse_device_xml_falls_back_to_remote() {
        let xml = r#"<MediaContainer>
            <Device name="Attic" provides="server" accessToken="tok2">
                <Connection local="0" uri="https://remote.example:32400"/>
            </Device>
        </MediaContainer>"#;

        let servers = parse_device_xml(xml).unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].base_uri, "https://remote.example:32400");
    }

    #[test]
    fn test_parse_device_xml_drops_non_servers_and_uriless_devices() {
        let xml = r#"<MediaContainer>
            <Device name="Phone" provides="player" accessToken="tok3">
                <Connection local="1" uri="http://192.168.1.20:32500"/>
            </Device>
            <Device name="Ghost" provides="server" accessToken="tok4">
            </Device>
            <Device name="Den" provides="server" accessToken="tok5">
                <Connection local="1" uri="http://192.168.1.10:32400"/>
            </Device>
        </MediaContainer>"#;

        let servers = parse_device_xml(xml).unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "Den");
    }

    #[test]
    fn test_parse_device_xml_empty_listing() {
        let servers = parse_device_xml("<MediaContainer></MediaContainer>").unwrap();
        assert!(servers.is_empty());
    }

    #[test]
    fn test_parse_sections_json() {
        let body = json!({
            "MediaContainer": {
                "Directory": [
                    {"key": "1", "title": "Movies", "type": "movie"},
                    {"key": "2", "title": "TV Shows", "type": "show"},
                    {"key": "3", "title": "Music", "type": "artist"}
                ]
            }
        });

        let sections = parse_sections_json(&body);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].key, "1");
        assert_eq!(sections[0].kind, LibraryKind::Movie);
        assert_eq!(sections[1].kind, LibraryKind::Show);
        assert_eq!(sections[2].kind, LibraryKind::Other);
    }

    #[test]
    fn test_parse_sections_json_missing_container() {
        let sections = parse_sections_json(&json!({}));
        assert!(sections.is_empty());
    }

    #[test]
    fn test_parse_machine_identifier_xml_form() {
        let xml = r#"<MediaContainer machineIdentifier="abc123" version="1.40"></MediaContainer>"#;
        assert_eq!(
            parse_machine_identifier("text/xml;charset=utf-8", xml),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_parse_machine_identifier_json_form() {
        let body = r#"{"MediaContainer": {"machineIdentifier": "def456"}}"#;
        assert_eq!(
            parse_machine_identifier("application/json", body),
            Some("def456".to_string())
        );
    }

    #[test]
    fn test_parse_machine_identifier_unexpected_content_type() {
        assert_eq!(parse_machine_identifier("text/html", "<html></html>"), None);
    }
}
