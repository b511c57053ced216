use std::path::PathBuf;

use super::*;

fn frame(index: usize, w: u32, h: u32) -> EncodedFrame {
    EncodedFrame {
        index,
        bytes: vec![index as u8, 1, 2, 3],
        width: w,
        height: h,
        offset_x: 0,
        offset_y: 0,
        path: PathBuf::from(format!("frame{}.png", index + 1)),
    }
}

fn spec(w: u32, h: u32) -> TimelineSpec<'static> {
    TimelineSpec {
        frame_rate: FrameRate::new(12.0).unwrap(),
        width: w,
        height: h,
        name: "bell",
        format: FrameFormat::Png,
    }
}

#[test]
fn document_header_matches_inputs() {
    let frames: Vec<_> = (0..16).map(|i| frame(i, 64, 64)).collect();
    let doc = assemble_document(&frames, &spec(64, 64)).unwrap();

    assert_eq!(doc.v, "5.9.0");
    assert_eq!(doc.fr, 12.0);
    assert_eq!((doc.ip, doc.op), (0, 16));
    assert_eq!((doc.w, doc.h), (64, 64));
    assert_eq!(doc.nm, "bell");
    assert_eq!(doc.assets.len(), 16);
    assert_eq!(doc.layers.len(), 16);
    assert!((doc.duration_secs() - 16.0 / 12.0).abs() < 1e-12);
}

#[test]
fn layer_windows_tile_the_timeline() {
    let frames: Vec<_> = (0..5).map(|i| frame(i, 10, 10)).collect();
    let doc = assemble_document(&frames, &spec(10, 10)).unwrap();

    let mut cursor = 0;
    for (i, layer) in doc.layers.iter().enumerate() {
        assert_eq!(layer.ip, cursor);
        assert_eq!(layer.op, cursor + 1);
        assert_eq!(layer.ind, i as u32 + 1);
        assert_eq!(layer.nm, format!("Frame {}", i + 1));
        assert_eq!(layer.ref_id, format!("image_{i}"));
        assert_eq!(layer.ty, 2);
        cursor += 1;
    }
    assert_eq!(cursor, doc.op);
}

#[test]
fn exactly_one_layer_is_opaque_at_each_sample() {
    fn opacity_at(layer: &ImageLayer, t: f64) -> f64 {
        // Hold interpolation: value of the last keyframe at or before t.
        let mut v = 0.0;
        for kf in &layer.ks.o.k {
            if kf.t <= t {
                v = kf.s[0];
            }
        }
        if t < f64::from(layer.ip) || t >= f64::from(layer.op) {
            0.0
        } else {
            v
        }
    }

    let frames: Vec<_> = (0..4).map(|i| frame(i, 8, 8)).collect();
    let doc = assemble_document(&frames, &spec(8, 8)).unwrap();

    let mut t = 0.0;
    while t < 4.0 {
        let opaque = doc
            .layers
            .iter()
            .filter(|l| opacity_at(l, t) > 0.0)
            .count();
        assert_eq!(opaque, 1, "at t={t}");
        t += 0.05;
    }
}

#[test]
fn opacity_track_is_a_hold_cut() {
    let frames: Vec<_> = (0..3).map(|i| frame(i, 8, 8)).collect();
    let doc = assemble_document(&frames, &spec(8, 8)).unwrap();

    let o = &doc.layers[2].ks.o;
    assert_eq!(o.a, 1);
    assert_eq!(
        o.k,
        vec![
            HoldKeyframe::new(2.0, 100.0),
            HoldKeyframe::new(2.0 + (1.0 - HOLD_EPSILON), 100.0),
            HoldKeyframe::new(3.0, 0.0),
        ]
    );
    assert!(o.k.iter().all(|k| k.h == 1));
}

#[test]
fn untrimmed_layers_sit_at_canvas_center() {
    let frames: Vec<_> = (0..2).map(|i| frame(i, 64, 48)).collect();
    let doc = assemble_document(&frames, &spec(64, 48)).unwrap();

    for layer in &doc.layers {
        assert_eq!(layer.ks.a.k, [32.0, 24.0, 0.0]);
        assert_eq!(layer.ks.p.k, [32.0, 24.0, 0.0]);
        assert_eq!(layer.ks.s.k, [100.0, 100.0, 100.0]);
        assert_eq!(layer.ks.r.k, 0.0);
    }
}

#[test]
fn trimmed_layers_keep_their_cell_position() {
    let mut f = frame(0, 10, 6);
    f.offset_x = 20;
    f.offset_y = 4;
    let doc = assemble_document(&[f], &spec(64, 64)).unwrap();

    assert_eq!((doc.w, doc.h), (64, 64));
    assert_eq!((doc.assets[0].w, doc.assets[0].h), (10, 6));
    let ks = &doc.layers[0].ks;
    assert_eq!(ks.a.k, [5.0, 3.0, 0.0]);
    assert_eq!(ks.p.k, [25.0, 7.0, 0.0]);
}

#[test]
fn assets_embed_data_uris() {
    let frames = vec![frame(0, 4, 4)];
    let doc = assemble_document(&frames, &spec(4, 4)).unwrap();
    let a = &doc.assets[0];
    assert_eq!(a.id, "image_0");
    assert_eq!(a.p, "data:image/png;base64,AAECAw==");
    assert_eq!(a.u, "");
    assert_eq!(a.e, 1);

    assert_eq!(data_uri(b"hi", FrameFormat::Jpeg), "data:image/jpeg;base64,aGk=");
}

#[test]
fn json_uses_lottie_keys() {
    let doc = assemble_document(&[frame(0, 4, 4)], &spec(4, 4)).unwrap();
    let v = serde_json::to_value(&doc).unwrap();
    let layer = &v["layers"][0];
    assert_eq!(layer["refId"], "image_0");
    assert!(layer.get("ref_id").is_none());
    assert_eq!(layer["ks"]["o"]["k"][1]["t"], 0.99);
    assert_eq!(layer["ks"]["p"]["a"], 0);
    assert_eq!(v["op"], 1);
}

#[test]
fn empty_or_misordered_frames_are_rejected() {
    assert!(assemble_document(&[], &spec(4, 4)).is_err());
    let frames = vec![frame(1, 4, 4), frame(0, 4, 4)];
    assert!(assemble_document(&frames, &spec(4, 4)).is_err());
}

#[test]
fn validate_catches_broken_documents() {
    let frames: Vec<_> = (0..3).map(|i| frame(i, 4, 4)).collect();
    let good = assemble_document(&frames, &spec(4, 4)).unwrap();

    let mut gap = good.clone();
    gap.layers[1].ip = 2;
    gap.layers[1].op = 3;
    assert!(gap.validate().is_err());

    let mut short = good.clone();
    short.assets.pop();
    assert!(short.validate().is_err());

    let mut wrong_ref = good;
    wrong_ref.layers[0].ref_id = "image_2".to_string();
    assert!(wrong_ref.validate().is_err());
}

#[test]
fn write_document_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("anim.json");
    let doc = assemble_document(&[frame(0, 4, 4)], &spec(4, 4)).unwrap();

    write_document(&doc, &path).unwrap();
    let back: LottieDocument = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(back, doc);
}
