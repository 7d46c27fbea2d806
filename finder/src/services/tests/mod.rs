//! Tests for finder services
//!
//! HTTP collaborators are exercised against wiremock servers; nothing here
//! talks to the real OpenAI or HubSpot APIs.
