mod ring_share {
    use alkaid_core::protocols::alkaid::{
        binary, bits, conversion, equality, mss, resharing, AlkaidNetworkExt, AlkaidState,
        PartyId,
    };
    use alkaid_net::local::LocalNetwork;
    use alkaid_types::{
        combine_additive_binary, combine_masked_binary, combine_ring_element,
        combine_ring_element_binary, combine_ring_elements, combine_ring_elements_binary,
        ring::{bit::Bit, int_ring::IntRing2k, ring_impl::RingElement},
        share_ring_element, share_ring_element_binary, share_ring_elements, MssShare,
    };
    use rand::{distributions::Standard, prelude::Distribution, thread_rng, Rng};

    /// Runs one closure per party over a fresh in-process network and
    /// protocol state, and collects the three results.
    fn run_parties<I, R, F>(inputs: [I; 3], f: F) -> [R; 3]
    where
        I: Send + 'static,
        R: Send + 'static,
        F: Fn(I, &LocalNetwork, &mut AlkaidState) -> R + Send + Sync + Clone + 'static,
    {
        let nets = LocalNetwork::new_3_parties();
        let mut handles = Vec::new();
        for (net, input) in nets.into_iter().zip(inputs) {
            let f = f.clone();
            handles.push(std::thread::spawn(move || {
                let mut state = AlkaidState::new(&net).expect("state setup");
                f(input, &net, &mut state)
            }));
        }
        let mut results = handles.into_iter().map(|h| h.join().expect("party thread"));
        [
            results.next().unwrap(),
            results.next().unwrap(),
            results.next().unwrap(),
        ]
    }

    macro_rules! apply_to_all {
        ($f:ident, [$($t:ty),*]) => {
            $(
                $f::<$t>();
            )*
        };
    }

    fn xor_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let y = rng.gen::<RingElement<T>>();
        let xs = share_ring_element_binary(x, &mut rng);
        let ys = share_ring_element_binary(y, &mut rng);
        let res: Vec<_> = xs
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| binary::xor(x, y))
            .collect();
        assert_eq!(combine_ring_element_binary(res[0], res[1], res[2]), x ^ y);
    }

    #[test]
    fn binary_xor() {
        apply_to_all!(xor_t, [Bit, u8, u16, u32, u64, u128]);
    }

    fn and_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let y = rng.gen::<RingElement<T>>();
        let xs = share_ring_element_binary(x, &mut rng);
        let ys = share_ring_element_binary(y, &mut rng);
        let inputs = [(xs[0], ys[0]), (xs[1], ys[1]), (xs[2], ys[2])];
        let [r0, r1, r2] = run_parties(inputs, |(x, y), net, state| {
            binary::and(&x, &y, net, state).unwrap()
        });
        assert_eq!(combine_ring_element_binary(r0, r1, r2), x & y);
    }

    #[test]
    fn binary_and() {
        apply_to_all!(and_t, [Bit, u8, u16, u32, u64, u128]);
    }

    fn and_to_additive_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let y = rng.gen::<RingElement<T>>();
        let xs = share_ring_element_binary(x, &mut rng);
        let ys = share_ring_element_binary(y, &mut rng);
        let inputs = [(xs[0], ys[0]), (xs[1], ys[1]), (xs[2], ys[2])];
        let [r0, r1, r2] = run_parties(inputs, |(x, y), net, state| {
            let ass = binary::and_to_additive(&x, &y, state);
            // the additive result must be reshared before reuse
            resharing::ass_to_rss(&ass, net, state).unwrap()
        });
        assert_eq!(combine_ring_element_binary(r0, r1, r2), x & y);
    }

    #[test]
    fn binary_and_to_additive() {
        apply_to_all!(and_to_additive_t, [Bit, u8, u16, u32, u64, u128]);
    }

    fn reshare_lattice_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let xs = share_ring_element_binary(x, &mut rng);
        // up to masked, down to replicated, down to additive, up to masked
        let [r0, r1, r2] = run_parties(xs, |x, net, state| {
            let m = resharing::rss_to_mss(&x, net, state).unwrap();
            let r = resharing::mss_to_rss(&m);
            let a = resharing::rss_to_ass(&r);
            let m2 = resharing::ass_to_mss(&a, net, state).unwrap();
            (m, r, a, m2)
        });
        // value survives every hop
        assert_eq!(combine_masked_binary(r0.0, r1.0, r2.0), x);
        assert_eq!(combine_ring_element_binary(r0.1, r1.1, r2.1), x);
        assert_eq!(combine_additive_binary(r0.2, r1.2, r2.2), x);
        assert_eq!(combine_masked_binary(r0.3, r1.3, r2.3), x);
        // white box: external values agree, mask slots replicate
        for (s0, s1, s2) in [(r0.0, r1.0, r2.0), (r0.3, r1.3, r2.3)] {
            assert_eq!(s0.e, s1.e);
            assert_eq!(s1.e, s2.e);
            assert_eq!(s1.d.b, s0.d.a);
            assert_eq!(s2.d.b, s1.d.a);
            assert_eq!(s0.d.b, s2.d.a);
        }
        assert_eq!(r1.1.b, r0.1.a);
        assert_eq!(r2.1.b, r1.1.a);
        assert_eq!(r0.1.b, r2.1.a);
    }

    #[test]
    fn reshare_lattice_roundtrip() {
        apply_to_all!(reshare_lattice_t, [Bit, u8, u16, u32, u64, u128]);
    }

    fn mss_and_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let y = rng.gen::<RingElement<T>>();
        let xs = share_ring_element_binary(x, &mut rng);
        let ys = share_ring_element_binary(y, &mut rng);
        let inputs = [(xs[0], ys[0]), (xs[1], ys[1]), (xs[2], ys[2])];
        let [r0, r1, r2] = run_parties(inputs, |(x, y), net, state| {
            let xm = resharing::rss_to_mss(&x, net, state).unwrap();
            let ym = resharing::rss_to_mss(&y, net, state).unwrap();
            let trip = mss::and_triple_many(&[xm], &[ym], net, state).unwrap();
            mss::and_pre(&xm, &ym, &trip[0])
        });
        assert_eq!(combine_ring_element_binary(r0, r1, r2), x & y);
    }

    #[test]
    fn mss_and() {
        apply_to_all!(mss_and_t, [Bit, u8, u16, u32, u64, u128]);
    }

    fn mss_xor_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let y = rng.gen::<RingElement<T>>();
        let xs = share_ring_element_binary(x, &mut rng);
        let ys = share_ring_element_binary(y, &mut rng);
        let inputs = [(xs[0], ys[0]), (xs[1], ys[1]), (xs[2], ys[2])];
        let [r0, r1, r2]: [MssShare<T>; 3] = run_parties(inputs, |(x, y), net, state| {
            let xm = resharing::rss_to_mss(&x, net, state).unwrap();
            let ym = resharing::rss_to_mss(&y, net, state).unwrap();
            mss::xor(&xm, &ym)
        });
        assert_eq!(combine_masked_binary(r0, r1, r2), x ^ y);
    }

    #[test]
    fn mss_xor() {
        apply_to_all!(mss_xor_t, [Bit, u8, u16, u32, u64, u128]);
    }

    fn a2b_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let xs = share_ring_element(x, &mut rng);
        let [r0, r1, r2] = run_parties(xs, |x, net, state| {
            conversion::a2b(x, net, state).unwrap()
        });
        assert_eq!(combine_ring_element_binary(r0, r1, r2), x);
    }

    #[test]
    fn a2b() {
        apply_to_all!(a2b_t, [Bit, u8, u16, u32, u64, u128]);
    }

    fn msb_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let xs = share_ring_element(x, &mut rng);
        let [r0, r1, r2] = run_parties(xs, |x, net, state| {
            conversion::msb(x, net, state).unwrap()
        });
        let expected = x.bit(T::K - 1);
        let msb = combine_ring_element_binary(r0, r1, r2);
        assert_eq!(msb.convert().convert(), expected);
    }

    #[test]
    fn msb() {
        apply_to_all!(msb_t, [Bit, u8, u16, u32, u64, u128]);
    }

    fn msb_of(x: u64) -> u64 {
        let mut rng = thread_rng();
        let xs = share_ring_element(RingElement(x), &mut rng);
        let [r0, r1, r2] = run_parties(xs, |x, net, state| {
            conversion::msb(x, net, state).unwrap()
        });
        combine_ring_element_binary(r0, r1, r2).convert().convert() as u64
    }

    #[test]
    fn msb_scenarios() {
        assert_eq!(msb_of(0x0000_0000_0000_0001), 0);
        assert_eq!(msb_of(0x8000_0000_0000_0000), 1);
        assert_eq!(msb_of(0xFFFF_FFFF_FFFF_FFFF), 1);
    }

    #[test]
    fn a2b_scenarios() {
        let mut rng = thread_rng();
        for x in [0x0000_0000_0000_0001u64, 0xFFFF_FFFF_FFFF_FFFF] {
            let xs = share_ring_element(RingElement(x), &mut rng);
            let [r0, r1, r2] = run_parties(xs, |x, net, state| {
                conversion::a2b(x, net, state).unwrap()
            });
            assert_eq!(combine_ring_element_binary(r0, r1, r2), RingElement(x));
        }
    }

    fn b2a_ppa_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let xs = share_ring_element_binary(x, &mut rng);
        let [r0, r1, r2] = run_parties(xs, |x, net, state| {
            conversion::b2a_by_ppa::<T, T, _>(&x, net, state).unwrap()
        });
        assert_eq!(combine_ring_element(r0, r1, r2), x);
    }

    #[test]
    fn b2a_by_ppa() {
        apply_to_all!(b2a_ppa_t, [u8, u16, u32, u64, u128]);
    }

    fn b2a_ot_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let xs = share_ring_element_binary(x, &mut rng);
        let [r0, r1, r2] = run_parties(xs, |x, net, state| {
            conversion::b2a_by_ot::<T, u64, _>(&x, net, state).unwrap()
        });
        let expected: u128 = x.convert().into();
        assert_eq!(
            combine_ring_element(r0, r1, r2),
            RingElement(expected as u64)
        );
    }

    #[test]
    fn b2a_by_ot() {
        apply_to_all!(b2a_ot_t, [Bit, u8]);
    }

    #[test]
    fn b2a_paths_agree() {
        // both conversions on the same 8 bit input must reconstruct alike
        let mut rng = thread_rng();
        let x = RingElement(0x7Fu8);
        let xs = share_ring_element_binary(x, &mut rng);
        let [o0, o1, o2] = run_parties(xs, |x, net, state| {
            let ot = conversion::b2a_by_ot::<u8, u64, _>(&x, net, state).unwrap();
            let ppa = conversion::b2a_by_ppa::<u8, u64, _>(&x, net, state).unwrap();
            (ot, ppa)
        });
        let ot = combine_ring_element(o0.0, o1.0, o2.0);
        let ppa = combine_ring_element(o0.1, o1.1, o2.1);
        assert_eq!(ot, RingElement(127u64));
        assert_eq!(ppa, RingElement(127u64));
    }

    fn a2b_b2a_roundtrip_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let xs = share_ring_element(x, &mut rng);
        let [r0, r1, r2] = run_parties(xs, |x, net, state| {
            let b = conversion::a2b(x, net, state).unwrap();
            conversion::b2a::<T, T, _>(&b, net, state).unwrap()
        });
        assert_eq!(combine_ring_element(r0, r1, r2), x);
    }

    #[test]
    fn a2b_b2a_roundtrip() {
        apply_to_all!(a2b_b2a_roundtrip_t, [u8, u16, u32, u64, u128]);
    }

    fn b2a_a2b_roundtrip_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let xs = share_ring_element_binary(x, &mut rng);
        let [r0, r1, r2] = run_parties(xs, |x, net, state| {
            let a = conversion::b2a::<T, T, _>(&x, net, state).unwrap();
            conversion::a2b(a, net, state).unwrap()
        });
        assert_eq!(combine_ring_element_binary(r0, r1, r2), x);
    }

    #[test]
    fn b2a_a2b_roundtrip() {
        apply_to_all!(b2a_a2b_roundtrip_t, [u8, u16, u32, u64, u128]);
    }

    #[test]
    fn a2b_b2a_batch() {
        let mut rng = thread_rng();
        let xs: Vec<RingElement<u64>> = (0..1024).map(|_| rng.gen()).collect();
        let shares = share_ring_elements(&xs, &mut rng);
        let [r0, r1, r2] = run_parties(shares, |x, net, state| {
            let b = conversion::a2b_many(&x, net, state).unwrap();
            conversion::b2a_many::<u64, u64, _>(&b, net, state).unwrap()
        });
        assert_eq!(combine_ring_elements(&r0, &r1, &r2), xs);
    }

    fn gen_non_zero<T: IntRing2k, R: Rng>(rng: &mut R) -> RingElement<T>
    where
        Standard: Distribution<T>,
    {
        loop {
            let el = rng.gen::<RingElement<T>>();
            if el != RingElement::from_bool(false) {
                return el;
            }
        }
    }

    fn eq_zero_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let zero = RingElement::<T>::from_bool(false);
        for (val, expected) in [(zero, true), (gen_non_zero::<T, _>(&mut rng), false)] {
            let xs = share_ring_element(val, &mut rng);
            let [r0, r1, r2] = run_parties(xs, |x, net, state| {
                equality::eq_zero(x, net, state).unwrap()
            });
            assert_eq!(
                combine_ring_element_binary(r0, r1, r2).convert().convert(),
                expected
            );
        }
    }

    #[test]
    fn eq_zero() {
        apply_to_all!(eq_zero_t, [u8, u16, u32, u64, u128]);
    }

    #[test]
    fn eq_scenarios() {
        let mut rng = thread_rng();
        for (x, y, expected) in [(42u64, 42u64, true), (42, 43, false)] {
            let xs = share_ring_element(RingElement(x), &mut rng);
            let ys = share_ring_element(RingElement(y), &mut rng);
            let inputs = [(xs[0], ys[0]), (xs[1], ys[1]), (xs[2], ys[2])];
            let [r0, r1, r2] = run_parties(inputs, |(x, y), net, state| {
                equality::eq(x, y, net, state).unwrap()
            });
            assert_eq!(
                combine_ring_element_binary(r0, r1, r2).convert().convert(),
                expected
            );
        }
    }

    #[test]
    fn eq_public_scenarios() {
        let mut rng = thread_rng();
        for (x, y, expected) in [(42u64, 42u64, true), (42, 43, false), (0, 0, true)] {
            let xs = share_ring_element(RingElement(x), &mut rng);
            let [r0, r1, r2] = run_parties(xs, move |x, net, state| {
                equality::eq_public(x, RingElement(y), net, state).unwrap()
            });
            assert_eq!(
                combine_ring_element_binary(r0, r1, r2).convert().convert(),
                expected
            );
        }
    }

    fn bit_split_shares_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let xs = share_ring_element_binary(x, &mut rng);
        let splits: Vec<_> = xs
            .iter()
            .map(|s| {
                let (hi, lo) = bits::bit_split_many(std::slice::from_ref(s), T::K).unwrap();
                (hi[0], lo[0])
            })
            .collect();
        let hi = combine_ring_element_binary(splits[0].0, splits[1].0, splits[2].0);
        let lo = combine_ring_element_binary(splits[0].1, splits[1].1, splits[2].1);
        for j in 0..T::K / 2 {
            assert_eq!(lo.bit(j), x.bit(2 * j));
            assert_eq!(hi.bit(j), x.bit(2 * j + 1));
        }
    }

    #[test]
    fn bit_split_shares() {
        apply_to_all!(bit_split_shares_t, [u8, u16, u32, u64, u128]);
    }

    #[test]
    fn batched_msb() {
        let mut rng = thread_rng();
        let xs: Vec<RingElement<u64>> = (0..64).map(|_| rng.gen()).collect();
        let shares = share_ring_elements(&xs, &mut rng);
        let [r0, r1, r2] = run_parties(shares, |x, net, state| {
            conversion::msb_many(&x, net, state).unwrap()
        });
        let got = combine_ring_elements_binary(&r0, &r1, &r2);
        for (got, x) in got.iter().zip(&xs) {
            assert_eq!(got.convert().convert(), x.bit(63));
        }
    }

    #[test]
    fn batched_eq() {
        let mut rng = thread_rng();
        let xs: Vec<RingElement<u32>> = (0..17).map(|_| rng.gen()).collect();
        let mut ys = xs.clone();
        // flip every third element
        for y in ys.iter_mut().step_by(3) {
            *y += RingElement(1);
        }
        let xs_sh = share_ring_elements(&xs, &mut rng);
        let ys_sh = share_ring_elements(&ys, &mut rng);
        let inputs = [
            (xs_sh[0].clone(), ys_sh[0].clone()),
            (xs_sh[1].clone(), ys_sh[1].clone()),
            (xs_sh[2].clone(), ys_sh[2].clone()),
        ];
        let [r0, r1, r2] = run_parties(inputs, |(x, y), net, state| {
            equality::eq_many(&x, &y, net, state).unwrap()
        });
        let got = combine_ring_elements_binary(&r0, &r1, &r2);
        for (i, got) in got.iter().enumerate() {
            assert_eq!(got.convert().convert(), xs[i] == ys[i]);
        }
    }

    #[test]
    fn tag_mismatch_is_fatal() {
        let nets = LocalNetwork::new(3);
        let mut iter = nets.into_iter();
        let n0 = iter.next().unwrap();
        let n1 = iter.next().unwrap();
        let h0 = std::thread::spawn(move || {
            n0.send_many(PartyId::P1, "step.a", &[RingElement(1u64)])
                .unwrap();
        });
        let h1 = std::thread::spawn(move || {
            n1.recv_many::<RingElement<u64>>(PartyId::P0, "step.b")
                .unwrap_err()
        });
        h0.join().unwrap();
        let err = h1.join().unwrap();
        assert!(err.to_string().contains("tag mismatch"));
    }

    fn widen_b2a_t<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        // narrow Boolean input into the full ring
        let mut rng = thread_rng();
        let x = rng.gen::<RingElement<T>>();
        let xs = share_ring_element_binary(x, &mut rng);
        let [r0, r1, r2] = run_parties(xs, |x, net, state| {
            conversion::b2a::<T, u128, _>(&x, net, state).unwrap()
        });
        let expected: u128 = x.convert().into();
        assert_eq!(combine_ring_element(r0, r1, r2), RingElement(expected));
    }

    #[test]
    fn b2a_widens() {
        apply_to_all!(widen_b2a_t, [Bit, u8, u16, u64]);
    }
}
