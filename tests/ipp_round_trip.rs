//! Crate-level round-trip tests for the IPP message codec (spec §8,
//! testable properties 1 and 6).
use std::io::Cursor;

use bytes::Bytes;

use ipp_raster::model::{DelimiterTag, Operation, StatusCode};
use ipp_raster::parser::IppParser;
use ipp_raster::reader::IppReader;
use ipp_raster::request::IppRequestResponse;
use ipp_raster::value::IppValue;
use ipp_raster::IppAttribute;

fn parse(bytes: Bytes) -> IppRequestResponse {
    IppParser::new(IppReader::new(Cursor::new(bytes.to_vec()))).parse().unwrap()
}

#[test]
fn request_id_is_echoed_unchanged() {
    let mut req = IppRequestResponse::new_request((2, 0), Operation::ValidateJob, 0x1234_5678);
    req.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(IppAttribute::ATTRIBUTES_CHARSET, IppValue::Charset("utf-8".try_into().unwrap())),
    );
    let decoded = parse(req.to_bytes().unwrap());
    assert_eq!(decoded.request_id(), 0x1234_5678);
    assert_eq!(decoded.header(), Operation::ValidateJob as u16);
}

#[test]
fn attribute_and_group_order_survive_a_round_trip() {
    let mut req = IppRequestResponse::new_request((2, 0), Operation::GetPrinterAttributes, 1);
    req.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(IppAttribute::ATTRIBUTES_CHARSET, IppValue::Charset("utf-8".try_into().unwrap())),
    );
    req.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(
            IppAttribute::ATTRIBUTES_NATURAL_LANGUAGE,
            IppValue::NaturalLanguage("en".try_into().unwrap()),
        ),
    );
    req.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new("zebra-attr", IppValue::Integer(1)),
    );
    req.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new("apple-attr", IppValue::Integer(2)),
    );
    req.attributes_mut()
        .add(DelimiterTag::JobAttributes, IppAttribute::new("job-attr", IppValue::Integer(3)));

    let decoded = parse(req.to_bytes().unwrap());

    let op_group = decoded.attributes().groups_of(DelimiterTag::OperationAttributes).next().unwrap();
    let names: Vec<&str> = op_group.attributes().iter().map(|a| a.name()).collect();
    // header attrs first per RFC 8011 4.1.4, then the rest in original order.
    assert_eq!(names, vec!["attributes-charset", "attributes-natural-language", "zebra-attr", "apple-attr"]);

    let job_group = decoded.attributes().groups_of(DelimiterTag::JobAttributes).next().unwrap();
    assert_eq!(job_group.get("job-attr").unwrap().value(), &IppValue::Integer(3));
}

#[test]
fn repeated_values_round_trip_as_a_1set_of() {
    let mut req = IppRequestResponse::new_request((2, 0), Operation::GetPrinterAttributes, 1);
    req.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(IppAttribute::ATTRIBUTES_CHARSET, IppValue::Charset("utf-8".try_into().unwrap())),
    );
    req.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(
            "media-supported",
            IppValue::Array(vec![
                IppValue::Keyword("na_letter_8.5x11in".try_into().unwrap()),
                IppValue::Keyword("iso_a4_210x297mm".try_into().unwrap()),
            ]),
        ),
    );

    let decoded = parse(req.to_bytes().unwrap());
    let group = decoded.attributes().groups_of(DelimiterTag::OperationAttributes).next().unwrap();
    let attr = group.get("media-supported").unwrap();
    assert!(matches!(attr.value(), IppValue::Array(v) if v.len() == 2));
}

#[test]
fn response_status_code_round_trips() {
    let mut resp = IppRequestResponse::new_response((2, 0), StatusCode::ClientErrorNotFound, 9);
    resp.attributes_mut().add(
        DelimiterTag::OperationAttributes,
        IppAttribute::new(IppAttribute::ATTRIBUTES_CHARSET, IppValue::Charset("utf-8".try_into().unwrap())),
    );
    let decoded = parse(resp.to_bytes().unwrap());
    assert_eq!(decoded.header(), StatusCode::ClientErrorNotFound as u16);
}

#[test]
fn trailing_document_data_survives_a_round_trip() {
    use ipp_raster::operation::job::PrintJob;
    use ipp_raster::operation::IppOperation;

    let op = PrintJob::new(
        "ipp://localhost/printers/q1".parse().unwrap(),
        "alice",
        Bytes::from_static(b"%PDF-1.4 fake document"),
    )
    .with_document_format("application/pdf");
    let req = op.into_ipp_request(5);
    let encoded = req.to_bytes().unwrap();
    let decoded = parse(encoded);
    assert_eq!(decoded.data(), &Bytes::from_static(b"%PDF-1.4 fake document"));
}

#[test]
fn nested_collection_round_trips() {
    // media-col containing a media-size collection (spec scenario S5).
    let media_size = IppValue::Collection(vec![
        ("x-dimension".try_into().unwrap(), IppValue::Integer(21590)),
        ("y-dimension".try_into().unwrap(), IppValue::Integer(27940)),
    ]);
    let media_col = IppValue::Collection(vec![("media-size".try_into().unwrap(), media_size)]);

    let mut req = IppRequestResponse::new_request((2, 0), Operation::PrintJob, 1);
    req.attributes_mut()
        .add(DelimiterTag::JobAttributes, IppAttribute::new(IppAttribute::MEDIA_COL, media_col.clone()));

    let decoded = parse(req.to_bytes().unwrap());
    let group = decoded.attributes().groups_of(DelimiterTag::JobAttributes).next().unwrap();
    assert_eq!(group.get(IppAttribute::MEDIA_COL).unwrap().value(), &media_col);
}

#[test]
fn out_of_band_values_round_trip() {
    let mut req = IppRequestResponse::new_request((2, 0), Operation::GetPrinterAttributes, 1);
    req.attributes_mut()
        .add(DelimiterTag::PrinterAttributes, IppAttribute::new("printer-state-message", IppValue::NoValue));
    req.attributes_mut()
        .add(DelimiterTag::PrinterAttributes, IppAttribute::new("some-unsupported-attr", IppValue::Unsupported));

    let decoded = parse(req.to_bytes().unwrap());
    let group = decoded.attributes().groups_of(DelimiterTag::PrinterAttributes).next().unwrap();
    assert_eq!(group.get("printer-state-message").unwrap().value(), &IppValue::NoValue);
    assert_eq!(group.get("some-unsupported-attr").unwrap().value(), &IppValue::Unsupported);
}
