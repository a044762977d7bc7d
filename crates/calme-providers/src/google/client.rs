//! Google Calendar API v3 client for the primary calendar.

use std::time::Duration;

use calme_core::{Event, EventTime, NewEvent, Reminder, ReminderMethod};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{BoxFuture, CalendarApi, PRIMARY_CALENDAR};
use crate::error::{ProviderError, ProviderResult};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Wall-clock format sent for new events; the zone travels in `timeZone`.
const WALL_CLOCK_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// [`CalendarApi`] backed by the Google Calendar REST API.
#[derive(Debug)]
pub struct GoogleCalendar {
    http_client: reqwest::Client,
    access_token: String,
    events_url: String,
}

impl GoogleCalendar {
    /// Creates a client that authenticates every request with `access_token`.
    pub fn new(
        access_token: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
            events_url: format!(
                "{}/calendars/{}/events",
                CALENDAR_API_BASE, PRIMARY_CALENDAR
            ),
        })
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url, urlencoding::encode(event_id))
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> ProviderResult<Response> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    format!("request failed: {}", e)
                };
                ProviderError::network(message).with_source(e)
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            && let Some(secs) = retry_after
        {
            return Err(ProviderError::rate_limited(format!(
                "rate limit exceeded, retry after {} seconds",
                secs
            )));
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::from_status(status, what, &body))
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> ProviderResult<T> {
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
        })
    }

    async fn fetch_upcoming(&self, max_results: u32) -> ProviderResult<Vec<Event>> {
        let request = self.http_client.get(&self.events_url).query(&[
            ("timeMin", Utc::now().to_rfc3339()),
            ("maxResults", max_results.to_string()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ]);

        let response = self.send(request, "events").await?;
        let list: EventListResponse = Self::read_json(response).await?;

        let events: Vec<Event> = list
            .items
            .into_iter()
            .filter(|e| e.status.as_deref() != Some("cancelled"))
            .filter_map(|e| match e.into_event() {
                Ok(event) => Some(event),
                Err(err) => {
                    warn!("skipping event: {}", err);
                    None
                }
            })
            .collect();

        debug!("fetched {} upcoming events", events.len());
        Ok(events)
    }

    async fn create(&self, event: NewEvent) -> ProviderResult<Event> {
        let body = InsertBody::from(&event);
        let request = self.http_client.post(&self.events_url).json(&body);

        let response = self.send(request, "new event").await?;
        let created: ApiEvent = Self::read_json(response).await?;
        let created = created.into_event()?;

        debug!("created event {}", created.id);
        Ok(created)
    }

    async fn fetch(&self, event_id: &str) -> ProviderResult<Event> {
        let what = format!("event {}", event_id);
        let request = self.http_client.get(self.event_url(event_id));

        let response = self.send(request, &what).await?;
        let event: ApiEvent = Self::read_json(response).await?;
        // Deleted events linger with status "cancelled".
        if event.status.as_deref() == Some("cancelled") {
            return Err(ProviderError::not_found(format!("{} not found", what)));
        }
        event.into_event()
    }

    async fn remove(&self, event_id: &str) -> ProviderResult<()> {
        let what = format!("event {}", event_id);
        let request = self.http_client.delete(self.event_url(event_id));

        self.send(request, &what).await?;
        debug!("deleted event {}", event_id);
        Ok(())
    }
}

impl CalendarApi for GoogleCalendar {
    fn list_upcoming(&self, max_results: u32) -> BoxFuture<'_, ProviderResult<Vec<Event>>> {
        Box::pin(self.fetch_upcoming(max_results))
    }

    fn insert(&self, event: NewEvent) -> BoxFuture<'_, ProviderResult<Event>> {
        Box::pin(self.create(event))
    }

    fn get<'a>(&'a self, event_id: &'a str) -> BoxFuture<'a, ProviderResult<Event>> {
        Box::pin(self.fetch(event_id))
    }

    fn delete<'a>(&'a self, event_id: &'a str) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(self.remove(event_id))
    }
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
}

/// An event as returned by the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    start: Option<ApiEventTime>,
    end: Option<ApiEventTime>,
    status: Option<String>,
    reminders: Option<ApiReminders>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<String>,
    date_time: Option<String>,
    time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiReminders {
    #[serde(default)]
    overrides: Vec<ApiReminder>,
}

/// Older events may still carry retired methods such as `sms`.
#[derive(Debug, Deserialize)]
struct ApiReminder {
    method: String,
    minutes: u32,
}

impl ApiReminder {
    fn into_reminder(self) -> Option<Reminder> {
        let method = match self.method.as_str() {
            "email" => ReminderMethod::Email,
            "popup" => ReminderMethod::Popup,
            other => {
                debug!("skipping reminder with method {:?}", other);
                return None;
            }
        };
        Some(Reminder {
            method,
            minutes: self.minutes,
        })
    }
}

impl ApiEvent {
    fn into_event(self) -> ProviderResult<Event> {
        let id = self
            .id
            .ok_or_else(|| ProviderError::invalid_response("event without id"))?;

        let start = self
            .start
            .ok_or_else(|| ProviderError::invalid_response(format!("event {} has no start", id)))?;
        let end = self
            .end
            .ok_or_else(|| ProviderError::invalid_response(format!("event {} has no end", id)))?;

        let time_zone = start.time_zone.clone();
        let mut event = Event::new(
            id.as_str(),
            self.summary.unwrap_or_default(),
            start.into_event_time(&id)?,
            end.into_event_time(&id)?,
        );

        if let Some(description) = self.description {
            event = event.with_description(description);
        }
        if let Some(tz) = time_zone {
            event = event.with_time_zone(tz);
        }
        if let Some(reminders) = self.reminders {
            event = event.with_reminders(
                reminders
                    .overrides
                    .into_iter()
                    .filter_map(ApiReminder::into_reminder)
                    .collect(),
            );
        }

        Ok(event)
    }
}

impl ApiEventTime {
    /// Timed events carry `dateTime`; all-day events only `date`.
    fn into_event_time(self, id: &str) -> ProviderResult<EventTime> {
        match (self.date_time, self.date) {
            (Some(dt), _) => DateTime::parse_from_rfc3339(&dt)
                .map(EventTime::DateTime)
                .map_err(|e| {
                    ProviderError::invalid_response(format!(
                        "event {} has invalid time {:?}: {}",
                        id, dt, e
                    ))
                }),
            (None, Some(date)) => NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map(EventTime::AllDay)
                .map_err(|e| {
                    ProviderError::invalid_response(format!(
                        "event {} has invalid date {:?}: {}",
                        id, date, e
                    ))
                }),
            (None, None) => Err(ProviderError::invalid_response(format!(
                "event {} has neither dateTime nor date",
                id
            ))),
        }
    }
}

/// Request body for events.insert.
#[derive(Debug, Serialize)]
struct InsertBody<'a> {
    summary: &'a str,
    description: &'a str,
    start: InsertTime<'a>,
    end: InsertTime<'a>,
    reminders: InsertReminders<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertReminders<'a> {
    use_default: bool,
    overrides: &'a [Reminder],
}

impl<'a> From<&'a NewEvent> for InsertBody<'a> {
    fn from(event: &'a NewEvent) -> Self {
        Self {
            summary: &event.summary,
            description: &event.description,
            start: InsertTime {
                date_time: event.start.format(WALL_CLOCK_FORMAT).to_string(),
                time_zone: &event.time_zone,
            },
            end: InsertTime {
                date_time: event.end.format(WALL_CLOCK_FORMAT).to_string(),
                time_zone: &event.time_zone,
            },
            reminders: InsertReminders {
                use_default: false,
                overrides: &event.reminders,
            },
        }
    }
}
