use crate::discovery::DISCOVERY_MSG;
use crate::sim::{SimFocuser, SimSwitch};
use crate::test_utils::TestServer;
use crate::{Devices, Server};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;

async fn start_with(server: Server) -> eyre::Result<TestServer> {
    let mut server = server;
    server.devices.register(
        SimFocuser::new("Focuser", 0, 200, 10.0).with_step_interval(Duration::ZERO),
    )?;
    server.devices.register(SimSwitch::new("Switch", 0, 4))?;
    TestServer::start(server).await
}

async fn start() -> eyre::Result<TestServer> {
    start_with(Server::default()).await
}

/// Server with only the devices registered by `register`.
async fn serve(
    register: impl FnOnce(&mut Devices) -> eyre::Result<()>,
) -> eyre::Result<TestServer> {
    let mut server = Server::default();
    register(&mut server.devices)?;
    TestServer::start(server).await
}

async fn request(
    server: &TestServer,
    method: Method,
    path: &str,
    params: &[(&str, &str)],
) -> eyre::Result<(StatusCode, Value)> {
    let request = server.client.request(method.clone(), server.url(path));
    let request = if method == Method::GET {
        request.query(params)
    } else {
        request.form(params)
    };
    let response = request.send().await?;
    Ok((response.status(), response.json().await?))
}

async fn get(
    server: &TestServer,
    path: &str,
    query: &[(&str, &str)],
) -> eyre::Result<(StatusCode, Value)> {
    request(server, Method::GET, path, query).await
}

async fn put(
    server: &TestServer,
    path: &str,
    form: &[(&str, &str)],
) -> eyre::Result<(StatusCode, Value)> {
    request(server, Method::PUT, path, form).await
}

async fn value(server: &TestServer, path: &str) -> eyre::Result<Value> {
    let (status, mut body) = get(server, path, &[]).await?;
    assert_eq!(status, StatusCode::OK, "{path}");
    assert_eq!(body["ErrorNumber"], 0, "{path}");
    Ok(body["Value"].take())
}

fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap_or(f64::NAN);
    assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
}

/// Server transaction ID consumed by a fresh request to `device`.
async fn transaction_id(server: &TestServer, device: &str) -> eyre::Result<u64> {
    let (_, body) = get(server, &format!("{device}/name"), &[]).await?;
    body["ServerTransactionID"]
        .as_u64()
        .ok_or_else(|| eyre::eyre!("no ServerTransactionID in {body}"))
}

/// The driver accepts the PUT and reports no error.
async fn assert_accepted(
    server: &TestServer,
    device: &str,
    action: &str,
    form: &[(&str, &str)],
) -> eyre::Result<()> {
    let (status, body) = put(server, &format!("{device}/{action}"), form).await?;
    assert_eq!(status, StatusCode::OK, "{action} {form:?}");
    assert_eq!(body["ErrorNumber"], 0, "{action} {form:?}");
    assert!(body.get("Value").is_none(), "{action} {body}");
    Ok(())
}

/// Each parameter set is answered with 400 naming `param`.
async fn assert_rejected(
    server: &TestServer,
    method: Method,
    path: &str,
    param: &str,
    cases: &[&[(&str, &str)]],
) -> eyre::Result<()> {
    for &params in cases {
        let (status, body) = request(server, method.clone(), path, params).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path} {params:?}");
        assert_eq!(body["ErrorNumber"], 0x401);
        assert_eq!(
            body["ErrorMessage"],
            format!("Missing or invalid required parameter: {param}")
        );
    }
    Ok(())
}

/// Each action refuses `method` with 405 and leaves the device counter alone.
async fn assert_wrong_verb(
    server: &TestServer,
    device: &str,
    method: Method,
    actions: &[&str],
) -> eyre::Result<()> {
    for action in actions {
        let before = transaction_id(server, device).await?;
        let response = server
            .client
            .request(method.clone(), server.url(&format!("{device}/{action}")))
            .send()
            .await?;
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{method} {action}"
        );
        assert_eq!(transaction_id(server, device).await?, before + 1, "{action}");
    }
    Ok(())
}

#[tokio::test]
async fn transaction_ids() -> eyre::Result<()> {
    let server = start().await?;

    let (status, body) = get(
        &server,
        "/api/v1/focuser/0/position",
        &[("ClientID", "1"), ("ClientTransactionID", "42")],
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "ClientTransactionID": 42,
            "ServerTransactionID": 1,
            "ErrorNumber": 0,
            "ErrorMessage": "",
            "Value": 0,
        })
    );

    let (_, body) = get(
        &server,
        "/api/v1/focuser/0/position",
        &[("ClientTransactionID", "43")],
    )
    .await?;
    assert_eq!(body["ClientTransactionID"], 43);
    assert_eq!(body["ServerTransactionID"], 2);
    assert_eq!(body["Value"], 0);

    // Counters are per device.
    let (_, body) = get(&server, "/api/v1/switch/0/maxswitch", &[]).await?;
    assert_eq!(body["ClientTransactionID"], 0);
    assert_eq!(body["ServerTransactionID"], 1);
    assert_eq!(body["Value"], 4);

    Ok(())
}

#[tokio::test]
async fn malformed_client_ids() -> eyre::Result<()> {
    let server = start().await?;

    let (status, body) = get(
        &server,
        "/api/v1/focuser/0/position",
        &[("ClientID", "abc"), ("ClientTransactionID", "7")],
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "ClientTransactionID": 7,
            "ServerTransactionID": 1,
            "ErrorNumber": 0x401,
            "ErrorMessage": "Invalid ClientID or ClientTransactionID",
        })
    );

    for client_id in ["", "-1", "+1", "4294967296"] {
        let (status, body) = put(
            &server,
            "/api/v1/focuser/0/move",
            &[("ClientID", client_id), ("Position", "10")],
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "ClientID={client_id:?}");
        assert_eq!(body["ErrorNumber"], 0x401);
    }

    // The rejected move never reached the driver.
    let (_, body) = get(&server, "/api/v1/focuser/0/position", &[]).await?;
    assert_eq!(body["Value"], 0);
    assert_eq!(body["ServerTransactionID"], 6);

    Ok(())
}

#[tokio::test]
async fn wrong_verb() -> eyre::Result<()> {
    let server = start().await?;

    let (status, body) = put(&server, "/api/v1/focuser/0/position", &[("Position", "1")]).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "ErrorMessage": "Method Not Allowed" }));

    let (status, _) = get(&server, "/api/v1/focuser/0/move", &[("Position", "1")]).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let response = server
        .client
        .delete(server.url("/api/v1/focuser/0/position"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    // None of the above touched the counter.
    let (_, body) = get(&server, "/api/v1/focuser/0/position", &[]).await?;
    assert_eq!(body["ServerTransactionID"], 1);

    Ok(())
}

#[tokio::test]
async fn unknown_resources() -> eyre::Result<()> {
    let server = start().await?;

    for path in [
        "/api/v1/telescope/0/tracking",
        "/api/v1/focuser/1/position",
        "/api/v1/focuser/01/position",
        "/api/v1/focuser/x/position",
        "/api/v1/focuser/0/Position",
        "/api/v1/focuser/0/slewtoazimuth",
        "/api/v2/focuser/0/position",
    ] {
        let response = server.client.get(server.url(path)).send().await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }

    let (_, body) = get(&server, "/api/v1/focuser/0/position", &[]).await?;
    assert_eq!(body["ServerTransactionID"], 1);

    Ok(())
}

#[tokio::test]
async fn focuser_move() -> eyre::Result<()> {
    let server = start().await?;

    let (_, body) = get(&server, "/api/v1/focuser/0/maxstep", &[]).await?;
    assert_eq!(body["Value"], 200);

    let (status, body) = put(
        &server,
        "/api/v1/focuser/0/move",
        &[("Position", "150"), ("ClientTransactionID", "9")],
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "ClientTransactionID": 9,
            "ServerTransactionID": 2,
            "ErrorNumber": 0,
            "ErrorMessage": "",
        })
    );

    let (_, body) = get(&server, "/api/v1/focuser/0/position", &[]).await?;
    assert_eq!(body["Value"], 150);
    let (_, body) = get(&server, "/api/v1/focuser/0/ismoving", &[]).await?;
    assert_eq!(body["Value"], false);

    Ok(())
}

#[tokio::test]
async fn invalid_parameters() -> eyre::Result<()> {
    let server = start().await?;

    let forms: [&[(&str, &str)]; 5] = [
        &[],
        &[("Position", "")],
        &[("Position", "abc")],
        &[("Position", "1.5")],
        &[("position", "10")],
    ];
    for form in forms {
        let (status, body) = put(&server, "/api/v1/focuser/0/move", form).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{form:?}");
        assert_eq!(body["ErrorNumber"], 0x401);
        assert_eq!(
            body["ErrorMessage"],
            "Missing or invalid required parameter: Position"
        );
    }

    // Failed extractions still count as transactions.
    let (_, body) = get(&server, "/api/v1/focuser/0/position", &[]).await?;
    assert_eq!(body["ServerTransactionID"], 6);

    Ok(())
}

#[tokio::test]
async fn bool_parameters() -> eyre::Result<()> {
    let server = start().await?;

    for (state, expected) in [("TRUE", true), ("0", false), ("True", true), ("false", false)] {
        let (status, _) = put(
            &server,
            "/api/v1/switch/0/setswitch",
            &[("Id", "0"), ("State", state)],
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = get(&server, "/api/v1/switch/0/getswitch", &[("Id", "0")]).await?;
        assert_eq!(body["Value"], expected, "State={state}");
    }

    for state in ["yes", "2", "", " true"] {
        let (status, _) = put(
            &server,
            "/api/v1/switch/0/setswitch",
            &[("Id", "0"), ("State", state)],
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "State={state:?}");
    }

    Ok(())
}

#[tokio::test]
async fn switch_values() -> eyre::Result<()> {
    let server = start().await?;

    let (status, _) = put(
        &server,
        "/api/v1/switch/0/setswitchvalue",
        &[("Id", "1"), ("Value", "5")],
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&server, "/api/v1/switch/0/getswitchvalue", &[("Id", "1")]).await?;
    assert_eq!(body["Value"], 1.0);

    // Lowercase `iD` alias.
    let (_, body) = get(&server, "/api/v1/switch/0/getswitchvalue", &[("iD", "1")]).await?;
    assert_eq!(body["Value"], 1.0);

    // IDs are passed through to the driver without bounds checks.
    let (status, body) = get(&server, "/api/v1/switch/0/getswitchvalue", &[("Id", "99")]).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ErrorNumber"], 0);
    assert_eq!(body["Value"], 0.0);

    let (_, body) = get(&server, "/api/v1/switch/0/getswitchname", &[("Id", "99")]).await?;
    assert_eq!(body["Value"], "Invalid");

    Ok(())
}

#[tokio::test]
async fn common_device_methods() -> eyre::Result<()> {
    let server = start().await?;

    let (_, body) = get(&server, "/api/v1/focuser/0/name", &[]).await?;
    assert_eq!(body["Value"], "Focuser");
    let (_, body) = get(&server, "/api/v1/focuser/0/interfaceversion", &[]).await?;
    assert_eq!(body["Value"], 2);
    let (_, body) = get(&server, "/api/v1/switch/0/driverinfo", &[]).await?;
    assert_eq!(body["Value"], "ASCOM Alpaca Switch Driver");
    let (_, body) = get(&server, "/api/v1/switch/0/supportedactions", &[]).await?;
    assert_eq!(body["Value"], json!([]));
    let (_, body) = get(&server, "/api/v1/switch/0/connected", &[]).await?;
    assert_eq!(body["Value"], true);

    let (status, body) = put(
        &server,
        "/api/v1/switch/0/action",
        &[("Action", "blink"), ("Parameters", "")],
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ErrorNumber"], 0x40C);
    assert!(body.get("Value").is_none());

    let (status, body) = put(&server, "/api/v1/switch/0/action", &[("Action", "blink")]).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["ErrorMessage"],
        "Missing or invalid required parameter: Parameters"
    );

    let (status, body) = put(
        &server,
        "/api/v1/switch/0/commandblind",
        &[("Command", "X"), ("Raw", "false")],
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ErrorNumber"], 0x400);

    let (_, body) = get(&server, "/api/v1/focuser/0/devicestate", &[]).await?;
    assert_eq!(
        body["Value"],
        json!([
            { "Name": "IsMoving", "Value": false },
            { "Name": "Position", "Value": 0 },
        ])
    );

    Ok(())
}

#[tokio::test]
async fn json_content_type() -> eyre::Result<()> {
    let server = start().await?;

    let response = server
        .client
        .get(server.url("/api/v1/focuser/0/position"))
        .send()
        .await?;
    assert_eq!(
        response.headers()[reqwest::header::CONTENT_TYPE],
        "application/json"
    );

    Ok(())
}

#[tokio::test]
async fn put_falls_back_to_query() -> eyre::Result<()> {
    let server = start().await?;

    let response = server
        .client
        .put(server.url("/api/v1/focuser/0/move"))
        .query(&[("Position", "20"), ("ClientTransactionID", "5")])
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await?;
    assert_eq!(body["ClientTransactionID"], 5);

    // Body parameters win over the query string.
    let response = server
        .client
        .put(server.url("/api/v1/focuser/0/move"))
        .query(&[("Position", "30")])
        .form(&[("Position", "40")])
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let (_, body) = get(&server, "/api/v1/focuser/0/position", &[]).await?;
    assert_eq!(body["Value"], 40);

    Ok(())
}

#[tokio::test]
async fn lowercase_transaction_alias() -> eyre::Result<()> {
    let server = start().await?;

    let (status, body) = get(
        &server,
        "/api/v1/focuser/0/position",
        &[("clienttransactionid", "11")],
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ClientTransactionID"], 11);

    let (status, _) = put(
        &server,
        "/api/v1/focuser/0/connected",
        &[("Connected", "true"), ("clienttransactionid", "abc")],
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let legacy = start_with(Server {
        legacy_transaction_alias: true,
        ..Server::default()
    })
    .await?;

    let (status, body) = put(
        &legacy,
        "/api/v1/focuser/0/connected",
        &[("Connected", "true"), ("clienttransactionid", "abc")],
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ClientTransactionID"], 0);

    Ok(())
}

#[tokio::test]
async fn management() -> eyre::Result<()> {
    let server = start().await?;

    let (status, body) = get(
        &server,
        "/management/apiversions",
        &[("ClientTransactionID", "3")],
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "ClientTransactionID": 3,
            "ServerTransactionID": 1,
            "ErrorNumber": 0,
            "ErrorMessage": "",
            "Value": [1],
        })
    );

    let (_, body) = get(&server, "/management/v1/configureddevices", &[]).await?;
    assert_eq!(body["ServerTransactionID"], 2);
    let devices = body["Value"].as_array().cloned().unwrap_or_default();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0]["DeviceName"], "Focuser");
    assert_eq!(devices[0]["DeviceType"], "focuser");
    assert_eq!(devices[0]["DeviceNumber"], 0);
    assert_eq!(devices[1]["DeviceType"], "switch");
    assert!(devices[1]["UniqueID"].is_string());

    let (_, body) = get(&server, "/management/v1/description", &[]).await?;
    assert_eq!(body["Value"]["ServerName"], "alpaca-observatory");
    assert_eq!(body["Value"]["ManufacturerVersion"], env!("CARGO_PKG_VERSION"));

    let (status, body) = get(
        &server,
        "/management/apiversions",
        &[("ClientID", "x"), ("ClientTransactionID", "4")],
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ClientTransactionID"], 4);
    assert_eq!(body["ServerTransactionID"], 0);
    assert_eq!(body["ErrorNumber"], 0x401);

    let (status, body) = put(&server, "/management/apiversions", &[]).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "ErrorMessage": "Method Not Allowed" }));

    let (_, body) = get(&server, "/management/apiversions", &[]).await?;
    assert_eq!(body["ServerTransactionID"], 4);

    Ok(())
}

#[tokio::test]
async fn discovery() -> eyre::Result<()> {
    let server = start().await?;

    let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await?;
    let mut buf = [0; 64];

    _ = socket.send_to(DISCOVERY_MSG, server.discovery_addr).await?;
    let (len, src) =
        tokio::time::timeout(Duration::from_secs(5), socket.recv_from(&mut buf)).await??;
    assert_eq!(src, server.discovery_addr);
    let reply = serde_json::from_slice::<Value>(&buf[..len])?;
    assert_eq!(reply, json!({ "AlpacaPort": server.listen_addr.port() }));

    let payloads: [&[u8]; 3] = [b"alpacadiscovery2", b"alpacadiscovery1 ", b""];
    for payload in payloads {
        _ = socket.send_to(payload, server.discovery_addr).await?;
        let reply =
            tokio::time::timeout(Duration::from_millis(300), socket.recv_from(&mut buf)).await;
        assert!(reply.is_err(), "unexpected reply to {payload:?}");
    }

    Ok(())
}

#[tokio::test]
async fn configured_devices_keep_registration_order() -> eyre::Result<()> {
    let server = serve(|devices| {
        devices.register(SimSwitch::new("Relays", 0, 2))?;
        devices.register(SimFocuser::new("Main focuser", 0, 200, 10.0))?;
        devices.register(SimSwitch::new("Heaters", 1, 2))?;
        Ok(())
    })
    .await?;

    let devices = value(&server, "/management/v1/configureddevices").await?;
    let listed: Vec<(&str, &str)> = devices
        .as_array()
        .into_iter()
        .flatten()
        .map(|device| {
            (
                device["DeviceType"].as_str().unwrap_or_default(),
                device["DeviceName"].as_str().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(
        listed,
        [
            ("switch", "Relays"),
            ("focuser", "Main focuser"),
            ("switch", "Heaters"),
        ]
    );

    Ok(())
}

#[cfg(feature = "dome")]
#[tokio::test]
async fn dome_endpoints() -> eyre::Result<()> {
    let server =
        serve(|devices| devices.register(crate::sim::SimDome::new("Dome", 0, true, true))).await?;
    let dome = "/api/v1/dome/0";

    assert_eq!(value(&server, &format!("{dome}/interfaceversion")).await?, 2);
    assert_eq!(value(&server, &format!("{dome}/shutterstatus")).await?, 1);
    assert_eq!(value(&server, &format!("{dome}/cansetaltitude")).await?, true);

    assert_accepted(&server, dome, "synctoazimuth", &[("Azimuth", "-10.5")]).await?;
    assert_close(&value(&server, &format!("{dome}/azimuth")).await?, 349.5);

    assert_accepted(&server, dome, "slaved", &[("Slaved", "True")]).await?;
    assert_eq!(value(&server, &format!("{dome}/slaved")).await?, true);

    assert_accepted(&server, dome, "openshutter", &[]).await?;
    assert_eq!(value(&server, &format!("{dome}/shutterstatus")).await?, 2);

    let commands: [(&str, &[(&str, &str)]); 7] = [
        ("slewtoazimuth", &[("Azimuth", "120")]),
        ("slewtoaltitude", &[("Altitude", "60")]),
        ("abortslew", &[]),
        ("closeshutter", &[]),
        ("findhome", &[]),
        ("park", &[]),
        ("setpark", &[]),
    ];
    for (action, form) in commands {
        assert_accepted(&server, dome, action, form).await?;
    }

    assert_wrong_verb(
        &server,
        dome,
        Method::GET,
        &[
            "abortslew",
            "closeshutter",
            "findhome",
            "openshutter",
            "park",
            "setpark",
            "slewtoaltitude",
            "slewtoazimuth",
            "synctoazimuth",
        ],
    )
    .await?;
    assert_wrong_verb(&server, dome, Method::PUT, &["azimuth", "shutterstatus", "athome"]).await?;

    assert_rejected(
        &server,
        Method::PUT,
        &format!("{dome}/slewtoazimuth"),
        "Azimuth",
        &[&[], &[("Azimuth", "")], &[("Azimuth", "north")], &[("Azimuth", "1e3")]],
    )
    .await?;
    assert_rejected(
        &server,
        Method::PUT,
        &format!("{dome}/slewtoaltitude"),
        "Altitude",
        &[&[("Altitude", "high")], &[("altitude", "60")]],
    )
    .await?;
    assert_rejected(
        &server,
        Method::PUT,
        &format!("{dome}/slaved"),
        "Slaved",
        &[&[("Slaved", "yes")]],
    )
    .await?;

    Ok(())
}

#[cfg(feature = "rotator")]
#[tokio::test]
async fn rotator_endpoints() -> eyre::Result<()> {
    let server = serve(|devices| {
        devices.register(
            crate::sim::SimRotator::new("Rotator", 0, 1.0).with_step_interval(Duration::ZERO),
        )
    })
    .await?;
    let rotator = "/api/v1/rotator/0";

    assert_eq!(value(&server, &format!("{rotator}/interfaceversion")).await?, 3);
    assert_eq!(value(&server, &format!("{rotator}/canreverse")).await?, true);

    assert_accepted(&server, rotator, "moveabsolute", &[("Position", "90")]).await?;
    assert_close(&value(&server, &format!("{rotator}/position")).await?, 90.0);

    assert_accepted(&server, rotator, "move", &[("Position", "-30")]).await?;
    assert_close(&value(&server, &format!("{rotator}/position")).await?, 60.0);
    assert_eq!(value(&server, &format!("{rotator}/ismoving")).await?, false);

    assert_accepted(&server, rotator, "reverse", &[("Reverse", "true")]).await?;
    assert_eq!(value(&server, &format!("{rotator}/reverse")).await?, true);
    assert_close(
        &value(&server, &format!("{rotator}/mechanicalposition")).await?,
        300.0,
    );

    assert_accepted(&server, rotator, "sync", &[("Position", "10")]).await?;
    assert_close(&value(&server, &format!("{rotator}/position")).await?, 10.0);
    assert_accepted(&server, rotator, "movemechanical", &[("Position", "340")]).await?;
    assert_close(&value(&server, &format!("{rotator}/position")).await?, 20.0);
    assert_accepted(&server, rotator, "halt", &[]).await?;

    assert_wrong_verb(
        &server,
        rotator,
        Method::GET,
        &["halt", "move", "moveabsolute", "movemechanical", "sync"],
    )
    .await?;
    assert_wrong_verb(&server, rotator, Method::PUT, &["position", "targetposition"]).await?;

    for action in ["move", "moveabsolute", "movemechanical", "sync"] {
        assert_rejected(
            &server,
            Method::PUT,
            &format!("{rotator}/{action}"),
            "Position",
            &[&[], &[("Position", "ninety")], &[("Position", "1.2.3")]],
        )
        .await?;
    }
    assert_rejected(
        &server,
        Method::PUT,
        &format!("{rotator}/reverse"),
        "Reverse",
        &[&[("Reverse", "2")], &[("Reverse", "")]],
    )
    .await?;

    Ok(())
}

#[cfg(feature = "filter_wheel")]
#[tokio::test]
async fn filter_wheel_endpoints() -> eyre::Result<()> {
    let server = serve(|devices| {
        devices.register(
            crate::sim::SimFilterWheel::new("Filter wheel", 0, 8)
                .with_step_interval(Duration::ZERO),
        )
    })
    .await?;
    let wheel = "/api/v1/filterwheel/0";

    assert_eq!(value(&server, &format!("{wheel}/interfaceversion")).await?, 2);
    assert_eq!(
        value(&server, &format!("{wheel}/names")).await?,
        json!(["Red", "Green", "Blue", "Luminance", "Ha", "OIII", "SII", "Clear"])
    );
    assert_eq!(
        value(&server, &format!("{wheel}/focusoffsets")).await?,
        json!([0, -20, -40, 0, 10, -15, 5, 0])
    );
    assert_eq!(value(&server, &format!("{wheel}/position")).await?, 0);

    assert_accepted(&server, wheel, "position", &[("Position", "3")]).await?;
    assert_eq!(value(&server, &format!("{wheel}/position")).await?, 3);

    // Out of range slots are ignored by the driver.
    assert_accepted(&server, wheel, "position", &[("Position", "99")]).await?;
    assert_eq!(value(&server, &format!("{wheel}/position")).await?, 3);

    assert_wrong_verb(&server, wheel, Method::PUT, &["names", "focusoffsets"]).await?;

    assert_rejected(
        &server,
        Method::PUT,
        &format!("{wheel}/position"),
        "Position",
        &[&[], &[("Position", "-1")], &[("Position", "two")], &[("Position", "1.5")]],
    )
    .await?;
    assert_eq!(value(&server, &format!("{wheel}/position")).await?, 3);

    Ok(())
}

#[cfg(feature = "cover_calibrator")]
#[tokio::test]
async fn cover_calibrator_endpoints() -> eyre::Result<()> {
    let server = serve(|devices| {
        devices.register(crate::sim::SimCoverCalibrator::new("Flat panel", 0, 255))
    })
    .await?;
    let panel = "/api/v1/covercalibrator/0";

    assert_eq!(value(&server, &format!("{panel}/interfaceversion")).await?, 1);
    assert_eq!(value(&server, &format!("{panel}/coverstate")).await?, 1);
    assert_eq!(value(&server, &format!("{panel}/calibratorstate")).await?, 1);
    assert_eq!(value(&server, &format!("{panel}/maxbrightness")).await?, 255);

    assert_accepted(&server, panel, "calibratoron", &[("Brightness", "128")]).await?;
    assert_eq!(value(&server, &format!("{panel}/brightness")).await?, 128);
    assert_eq!(value(&server, &format!("{panel}/calibratorstate")).await?, 2);
    assert_eq!(value(&server, &format!("{panel}/calibratorchanging")).await?, true);

    assert_accepted(&server, panel, "opencover", &[]).await?;
    assert_eq!(value(&server, &format!("{panel}/coverstate")).await?, 2);
    assert_accepted(&server, panel, "haltcover", &[]).await?;
    assert_eq!(value(&server, &format!("{panel}/coverstate")).await?, 4);
    assert_accepted(&server, panel, "closecover", &[]).await?;
    assert_accepted(&server, panel, "calibratoroff", &[]).await?;
    assert_eq!(value(&server, &format!("{panel}/brightness")).await?, 0);

    assert_wrong_verb(
        &server,
        panel,
        Method::GET,
        &["calibratoroff", "calibratoron", "closecover", "haltcover", "opencover"],
    )
    .await?;
    assert_wrong_verb(&server, panel, Method::PUT, &["coverstate", "brightness"]).await?;

    assert_rejected(
        &server,
        Method::PUT,
        &format!("{panel}/calibratoron"),
        "Brightness",
        &[&[], &[("Brightness", "-5")], &[("Brightness", "12.5")], &[("Brightness", "")]],
    )
    .await?;

    Ok(())
}

#[cfg(feature = "observing_conditions")]
#[tokio::test]
async fn observing_conditions_endpoints() -> eyre::Result<()> {
    let server = serve(|devices| {
        devices.register(crate::sim::SimObservingConditions::new("Weather", 0))
    })
    .await?;
    let weather = "/api/v1/observingconditions/0";

    assert_eq!(value(&server, &format!("{weather}/interfaceversion")).await?, 1);

    assert_accepted(&server, weather, "averageperiod", &[("AveragePeriod", "1.5")]).await?;
    assert_close(&value(&server, &format!("{weather}/averageperiod")).await?, 1.5);
    assert_accepted(&server, weather, "refresh", &[]).await?;

    let humidity = value(&server, &format!("{weather}/humidity")).await?;
    assert!(humidity.as_f64().is_some_and(|h| (59.0..=61.0).contains(&h)), "{humidity}");

    let (status, body) = get(
        &server,
        &format!("{weather}/sensordescription"),
        &[("SensorName", "Temperature")],
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Value"], "Simulated temperature sensor");

    let (status, body) = get(
        &server,
        &format!("{weather}/timesincelastupdate"),
        &[("SensorName", "Humidity")],
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["Value"].as_f64().is_some_and(|age| age < 60.0), "{body}");

    for action in ["sensordescription", "timesincelastupdate"] {
        assert_rejected(
            &server,
            Method::GET,
            &format!("{weather}/{action}"),
            "SensorName",
            &[&[], &[("SensorName", "")]],
        )
        .await?;
    }
    assert_rejected(
        &server,
        Method::PUT,
        &format!("{weather}/averageperiod"),
        "AveragePeriod",
        &[&[], &[("AveragePeriod", "slow")]],
    )
    .await?;

    assert_wrong_verb(&server, weather, Method::GET, &["refresh"]).await?;
    assert_wrong_verb(
        &server,
        weather,
        Method::PUT,
        &["humidity", "sensordescription", "timesincelastupdate"],
    )
    .await?;

    Ok(())
}

#[cfg(feature = "safety_monitor")]
#[tokio::test]
async fn safety_monitor_endpoints() -> eyre::Result<()> {
    let server = serve(|devices| {
        devices.register(crate::sim::SimSafetyMonitor::new("Roof sensor", 0))
    })
    .await?;
    let monitor = "/api/v1/safetymonitor/0";

    assert_eq!(value(&server, &format!("{monitor}/interfaceversion")).await?, 3);
    assert_eq!(value(&server, &format!("{monitor}/issafe")).await?, true);

    assert_wrong_verb(&server, monitor, Method::PUT, &["issafe", "interfaceversion"]).await?;

    Ok(())
}
