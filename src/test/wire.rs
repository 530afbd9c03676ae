use crate::net::SignalMsg;

#[test]
fn signal_wire_format_round_trips() {
    let msgs = [
        SignalMsg::Setup(13),
        SignalMsg::CallProceeding,
        SignalMsg::Connect(1),
        SignalMsg::CallAck,
        SignalMsg::Wait(14),
        SignalMsg::End(2),
        SignalMsg::EndAck,
    ];
    for msg in msgs {
        let wire = msg.to_string();
        assert_eq!(SignalMsg::from_wire(&wire), Some(msg), "wire: {wire}");
    }
}

#[test]
fn malformed_argument_becomes_sentinel() {
    assert_eq!(SignalMsg::from_wire("conn abc"), Some(SignalMsg::Connect(-1)));
    assert_eq!(SignalMsg::from_wire("setup"), Some(SignalMsg::Setup(-1)));
    assert_eq!(SignalMsg::from_wire("wait "), Some(SignalMsg::Wait(-1)));
    assert_eq!(SignalMsg::from_wire("end 1.5"), Some(SignalMsg::End(-1)));
}

#[test]
fn negative_argument_is_parsed_as_is() {
    assert_eq!(SignalMsg::from_wire("end -5"), Some(SignalMsg::End(-5)));
}

#[test]
fn unknown_or_uppercase_token_is_rejected() {
    assert_eq!(SignalMsg::from_wire("teardown 3"), None);
    assert_eq!(SignalMsg::from_wire("SETUP 13"), None);
    assert_eq!(SignalMsg::from_wire(""), None);
}

#[test]
fn argumentless_messages_ignore_trailing_text() {
    assert_eq!(SignalMsg::from_wire("callpro"), Some(SignalMsg::CallProceeding));
    assert_eq!(SignalMsg::from_wire("callack 7"), Some(SignalMsg::CallAck));
    assert_eq!(SignalMsg::from_wire("endack"), Some(SignalMsg::EndAck));
}
