// SPDX-License-Identifier: Apache-2.0

use crate::API_ERROR_CODES;
use contacts_model::PHONE_PATTERN;
use serde_json::{json, Value};

pub const OPENAPI_TITLE: &str = "contacts API";
pub const OPENAPI_VERSION: &str = "v1";

fn error_response(description: &str) -> Value {
    json!({
      "description": description,
      "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ErrorEnvelope"}}}
    })
}

fn contact_response(description: &str) -> Value {
    json!({
      "description": description,
      "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Contact"}}}
    })
}

fn id_parameter() -> Value {
    json!({"name": "id", "in": "path", "required": true, "schema": {"type": "string"}})
}

fn draft_body() -> Value {
    json!({
      "required": true,
      "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ContactDraft"}}}
    })
}

#[must_use]
pub fn openapi_spec() -> Value {
    json!({
      "openapi": "3.0.3",
      "info": {
        "title": OPENAPI_TITLE,
        "version": OPENAPI_VERSION
      },
      "paths": {
        "/api/contacts": {
          "get": {
            "responses": {
              "200": {
                "description": "every stored contact",
                "content": {"application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/Contact"}}}}
              },
              "500": error_response("storage unavailable")
            }
          },
          "post": {
            "requestBody": draft_body(),
            "responses": {
              "201": contact_response("created contact"),
              "400": error_response("validation failed or malformed body"),
              "413": error_response("body too large"),
              "500": error_response("storage unavailable")
            }
          }
        },
        "/api/contacts/{id}": {
          "get": {
            "parameters": [id_parameter()],
            "responses": {
              "200": contact_response("contact"),
              "400": error_response("malformed path id"),
              "404": error_response("contact not found"),
              "500": error_response("storage unavailable")
            }
          },
          "put": {
            "parameters": [id_parameter()],
            "requestBody": draft_body(),
            "responses": {
              "200": contact_response("replaced contact"),
              "400": error_response("validation failed, malformed body or path id"),
              "404": error_response("contact not found"),
              "413": error_response("body too large"),
              "500": error_response("storage unavailable")
            }
          },
          "delete": {
            "parameters": [id_parameter()],
            "responses": {
              "204": {"description": "deleted"},
              "400": error_response("malformed path id"),
              "404": error_response("contact not found"),
              "500": error_response("storage unavailable")
            }
          }
        },
        "/api/openapi.json": {"get": {"responses": {"200": {"description": "this document"}}}},
        "/api/version": {"get": {"responses": {"200": {"description": "service version metadata"}}}},
        "/healthz": {"get": {"responses": {"200": {"description": "ok"}}}},
        "/metrics": {"get": {"responses": {"200": {"description": "prometheus metrics"}}}},
        "/readyz": {
          "get": {
            "responses": {
              "200": {"description": "ready"},
              "503": error_response("not ready")
            }
          }
        }
      },
      "components": {
        "schemas": {
          "ApiError": {
            "type": "object",
            "required": ["code", "message", "details", "request_id"],
            "additionalProperties": false,
            "properties": {
              "code": {"$ref": "#/components/schemas/ApiErrorCode"},
              "details": {"type": "object"},
              "message": {"type": "string"},
              "request_id": {"type": "string"}
            }
          },
          "ApiErrorCode": {
            "type": "string",
            "enum": API_ERROR_CODES
          },
          "Contact": {
            "type": "object",
            "required": ["id", "name", "surname"],
            "properties": {
              "email": {"type": "string", "format": "email", "nullable": true},
              "id": {"type": "string"},
              "name": {"type": "string"},
              "phoneNumber": {"type": "string", "pattern": PHONE_PATTERN, "nullable": true},
              "surname": {"type": "string"}
            }
          },
          "ContactDraft": {
            "type": "object",
            "required": ["name", "surname"],
            "properties": {
              "email": {"type": "string", "format": "email", "nullable": true},
              "name": {"type": "string", "minLength": 1},
              "phoneNumber": {"type": "string", "pattern": PHONE_PATTERN, "nullable": true},
              "surname": {"type": "string", "minLength": 1}
            }
          },
          "ErrorEnvelope": {
            "type": "object",
            "required": ["error"],
            "properties": {
              "error": {"$ref": "#/components/schemas/ApiError"}
            }
          }
        }
      }
    })
}
